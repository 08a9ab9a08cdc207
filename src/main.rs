use chrono::NaiveDate;
use clap::Parser;
use loan_calculator::loan::*;
use log::error;
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// Loan repayment calculator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Amount borrowed
    #[arg(long)]
    principal: f64,

    /// Annual interest rate in percent (i.e., 6.5)
    #[arg(long)]
    rate: f64,

    /// Term in whole years
    #[arg(long, default_value_t = 0)]
    years: u32,

    /// Months added to the term
    #[arg(long, default_value_t = 0)]
    months: u32,

    /// First payment period as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Print the full amortization schedule
    #[arg(long)]
    schedule: bool,
}

fn main() -> ExitCode {
    if let Err(err) = SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("logger setup failed: {}", err);
    }

    let args = Args::parse();
    let input = LoanInput::new(args.principal, args.rate, args.years).with_term_months(args.months);
    let calculator = loan_calculator();

    let summary = match calculator.summary(&input) {
        Ok(summary) => summary,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", summary);

    if args.schedule {
        let schedule = match args.start {
            Some(start) => calculator.schedule_from(&input, start),
            None => calculator.schedule(&input),
        };
        match schedule {
            Ok(schedule) => show_amortization(&schedule),
            Err(err) => {
                error!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    // verifies that the public types can cross threads
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<LoanInput>();
        is_normal::<LoanSummary>();
        is_normal::<PaymentScheduleEntry>();
        is_normal::<LoanCalculator>();
    }

    #[test]
    fn parses_args() {
        let args = Args::parse_from([
            "loan_calculator",
            "--principal",
            "100000",
            "--rate",
            "6",
            "--years",
            "1",
            "--start",
            "2024-01-15",
            "--schedule",
        ]);
        assert_eq!(args.principal, 100000.);
        assert_eq!(args.months, 0);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(args.schedule);
    }
}
