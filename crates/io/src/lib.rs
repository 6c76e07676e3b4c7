// File I/O: term sheet and booking loaders, report writers

pub mod booking;
pub mod csv;
pub mod error;
pub mod json;
pub mod markdown;
pub mod report;
pub mod term_sheet;

pub use booking::{load_booking_file, BookingDataset, BookingSummary};
pub use error::{LoadError, ReportError};
pub use report::{console_summary, report_base_name, write_reports, ReportFormat};
pub use term_sheet::{load_term_sheet, TermSheet};
