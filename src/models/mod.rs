//! Data models for the library server

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanDetail, LoanHistoryItem, LoanStatus, MemberLoans};
pub use member::Member;
