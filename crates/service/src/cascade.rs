/// Rows removed alongside the deleted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub courses: u64,
    pub enrollments: u64,
}
