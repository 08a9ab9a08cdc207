//! Fixed-rate loan amortization: the equated monthly installment (EMI),
//! total cost and interest of a loan, and its month-by-month schedule.
//!
//! ```
//! use loan_calculator::compute_summary;
//!
//! let summary = compute_summary(100000., 6., 1, 0).unwrap();
//! assert_eq!(summary.emi, 8606.64);
//! assert_eq!(summary.total_cost, 103279.72);
//! assert_eq!(summary.total_interest, 3279.72);
//! ```

pub mod error;
pub mod loan;

pub use error::{LoanError, Result};
pub use loan::{
    compute_summary, generate_schedule, generate_schedule_from, loan_calculator,
    show_amortization, summarize, LoanCalculator, LoanInput, LoanSummary, PaymentScheduleEntry,
};
