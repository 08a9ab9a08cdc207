use chrono::{Local, Months, NaiveDate};
use log::{info, trace, warn};
use std::fmt;

use crate::error::{LoanError, Result};

const DEC_PLACES: i32 = 2;

/// Terms of a fixed-rate loan repaid in equal monthly installments.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoanInput {
    pub principal: f64,
    /// Annual rate as a percentage (i.e., 6.0 for 6%).
    pub annual_rate: f64,
    pub term_years: u32,
    /// Months on top of `term_years`.
    pub term_months: u32,
}

impl LoanInput {
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
            term_months: 0,
        }
    }

    pub fn with_term_months(mut self, term_months: u32) -> Self {
        self.term_months = term_months;
        self
    }

    /// Number of monthly payments over the whole term.
    pub fn pmt_count(&self) -> Result<u32> {
        self.term_years
            .checked_mul(12)
            .and_then(|months| months.checked_add(self.term_months))
            .filter(|&count| count > 0)
            .ok_or(LoanError::InvalidTerm {
                years: self.term_years,
                months: self.term_months,
            })
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12. / 100.
    }

    // rejects inputs the annuity formula can't price, returning the payment count
    fn validate(&self) -> Result<u32> {
        let checked = if !(self.principal.is_finite() && self.principal > 0.) {
            Err(LoanError::InvalidInput(format!(
                "principal must be positive, got {}",
                self.principal
            )))
        } else if !(self.annual_rate.is_finite() && self.annual_rate >= 0.) {
            Err(LoanError::InvalidInput(format!(
                "annual rate must not be negative, got {}",
                self.annual_rate
            )))
        } else {
            self.pmt_count()
        };

        if let Err(err) = &checked {
            warn!("rejected loan ({}): {}", self, err);
        }
        checked
    }
}

impl fmt::Display for LoanInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${:.2}, annual rate {}%, term {} years {} months",
            self.principal, self.annual_rate, self.term_years, self.term_months
        )
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoanSummary {
    /// Equated monthly installment.
    pub emi: f64,
    pub total_cost: f64,
    pub total_interest: f64,
}

impl fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "monthly payment ${:.2}, total cost ${:.2}, total interest ${:.2}",
            self.emi, self.total_cost, self.total_interest
        )
    }
}

/// One month of an amortization schedule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Debug)]
pub struct PaymentScheduleEntry {
    pub pmt_number: u32,
    pub pmt_date: NaiveDate,
    /// Abbreviated month and year, e.g. `Oct-2026`.
    pub period_label: String,
    pub principal_payment: f64,
    pub interest_payment: f64,
    pub total_payment: f64,
    /// Principal outstanding after this payment, never below zero.
    pub balance: f64,
}

impl PaymentScheduleEntry {
    pub fn new(
        pmt_number: u32,
        pmt_date: NaiveDate,
        principal_payment: f64,
        interest_payment: f64,
        total_payment: f64,
        balance: f64,
    ) -> Self {
        Self {
            pmt_number,
            pmt_date,
            period_label: pmt_date.format("%b-%Y").to_string(),
            principal_payment,
            interest_payment,
            total_payment,
            balance,
        }
    }
}

impl fmt::Display for PaymentScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, period {}, principal ${:.2}, interest ${:.2}, payment ${:.2}, balance ${:.2}",
            self.pmt_number,
            self.period_label,
            self.principal_payment,
            self.interest_payment,
            self.total_payment,
            self.balance
        )
    }
}

/// Stateless handle over the free functions in this module, for hosts that
/// want a single calculator value to pass around.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LoanCalculator;

impl LoanCalculator {
    pub fn summary(&self, input: &LoanInput) -> Result<LoanSummary> {
        summarize(input)
    }

    pub fn schedule(&self, input: &LoanInput) -> Result<Vec<PaymentScheduleEntry>> {
        generate_schedule_from(input, today())
    }

    pub fn schedule_from(
        &self,
        input: &LoanInput,
        start_date: NaiveDate,
    ) -> Result<Vec<PaymentScheduleEntry>> {
        generate_schedule_from(input, start_date)
    }
}

pub fn loan_calculator() -> LoanCalculator {
    LoanCalculator
}

/// EMI, total cost and total interest, each rounded to 2 decimal places.
///
/// # Errors
///
/// `InvalidTerm` when the term has no payments, `InvalidInput` for a
/// non-positive principal or a negative rate.
pub fn compute_summary(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
    term_months: u32,
) -> Result<LoanSummary> {
    summarize(&LoanInput::new(principal, annual_rate, term_years).with_term_months(term_months))
}

pub fn summarize(input: &LoanInput) -> Result<LoanSummary> {
    let (pmt_count, pmt_amount) = pmt_terms(input)?;

    let total_cost = pmt_amount * f64::from(pmt_count);
    let total_interest = total_cost - input.principal;

    let summary = LoanSummary {
        emi: round(pmt_amount, DEC_PLACES),
        total_cost: round(total_cost, DEC_PLACES),
        total_interest: round(total_interest, DEC_PLACES),
    };
    if ![summary.emi, summary.total_cost, summary.total_interest]
        .iter()
        .all(|amt| amt.is_finite())
    {
        return Err(no_finite_amount(input));
    }
    info!("{} -> {}", input, summary);
    Ok(summary)
}

/// Month-by-month schedule starting from today's local date.
pub fn generate_schedule(
    principal: f64,
    annual_rate: f64,
    term_years: u32,
    term_months: u32,
) -> Result<Vec<PaymentScheduleEntry>> {
    generate_schedule_from(
        &LoanInput::new(principal, annual_rate, term_years).with_term_months(term_months),
        today(),
    )
}

/// Month-by-month schedule whose first period falls on `start_date`.
///
/// Period `n` is dated `start_date` plus `n` calendar months; a day past the
/// end of a shorter month is clamped to that month's last day, so a schedule
/// starting Jan 31 runs Feb 28 (or 29), Mar 31, Apr 30, ...
///
/// The balance is amortized with the unrounded installment so the last
/// period closes at zero; only the reported figures are rounded.
pub fn generate_schedule_from(
    input: &LoanInput,
    start_date: NaiveDate,
) -> Result<Vec<PaymentScheduleEntry>> {
    let (pmt_count, pmt_amount) = pmt_terms(input)?;
    let pmt_rate = input.monthly_rate();

    let mut sched_pmt: Vec<PaymentScheduleEntry> = Vec::new();
    let mut remaining = input.principal;

    for offset in 0..pmt_count {
        let pmt_date = start_date
            .checked_add_months(Months::new(offset))
            .ok_or(LoanError::DateOutOfRange(start_date))?;

        let interest = remaining * pmt_rate;
        let principal_paid = pmt_amount - interest;
        remaining -= principal_paid;
        trace!(
            "pmt # {}, date {}, interest {}, principal {}, end bal {}",
            offset + 1,
            pmt_date,
            interest,
            principal_paid,
            remaining
        );

        sched_pmt.push(PaymentScheduleEntry::new(
            offset + 1,
            pmt_date,
            round(principal_paid, DEC_PLACES),
            round(interest, DEC_PLACES),
            round(pmt_amount, DEC_PLACES),
            round(remaining.max(0.), DEC_PLACES),
        ));
    }

    info!("{} -> {} scheduled payments from {}", input, sched_pmt.len(), start_date);
    Ok(sched_pmt)
}

pub fn show_amortization(schedule: &[PaymentScheduleEntry]) {
    for pmt in schedule {
        println!("{}", pmt);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// validated payment count and the unrounded installment
fn pmt_terms(input: &LoanInput) -> Result<(u32, f64)> {
    let pmt_count = input.validate()?;
    let pmt_amount = get_pmt_amount(input.principal, input.monthly_rate(), pmt_count);

    // every reported amount is bounded by one of these two once rounded
    if round(pmt_amount, DEC_PLACES).is_finite()
        && round(input.principal, DEC_PLACES).is_finite()
    {
        Ok((pmt_count, pmt_amount))
    } else {
        Err(no_finite_amount(input))
    }
}

fn no_finite_amount(input: &LoanInput) -> LoanError {
    LoanError::InvalidInput(format!("amounts overflow for {}", input))
}

fn get_pmt_amount(principal: f64, pmt_rate: f64, pmt_count: u32) -> f64 {
    let total_pmts = f64::from(pmt_count);

    // the annuity factor is 0/0 without interest
    if pmt_rate == 0. {
        return principal / total_pmts;
    }

    // 1 + r rounds to 1 for tiny rates, so grow in log space
    let log_growth = total_pmts * pmt_rate.ln_1p();
    let denominator = log_growth.exp_m1();
    if denominator == 0. {
        return principal / total_pmts;
    }

    (principal * pmt_rate * log_growth.exp()) / denominator
}

// half away from zero
fn round(amt: f64, dec: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(dec)).round() / 10_f64.powi(dec)
    }
}
