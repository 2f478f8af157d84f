use chrono::NaiveDate;
use std::fmt;

/// Row-level attendance outcome, derived after date and boolean coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttendanceStatus {
    Attended,
    RegisteredNoAttendance,
    NotRegistered,
}

impl AttendanceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Attended => "Attended",
            AttendanceStatus::RegisteredNoAttendance => "Registered - No Attendance",
            AttendanceStatus::NotRegistered => "Not Registered",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded attendance date wins over everything else.
pub fn derive_status(registered: bool, attendance_date: Option<NaiveDate>) -> AttendanceStatus {
    if attendance_date.is_some() {
        AttendanceStatus::Attended
    } else if registered {
        AttendanceStatus::RegisteredNoAttendance
    } else {
        AttendanceStatus::NotRegistered
    }
}
