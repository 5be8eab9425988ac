//! Counts the transfers in an uploaded batch CSV and sums their amounts.
//!
//! The template has the columns To Account Bank, To Account No,
//! To Account Name and Amount. Amounts may carry a currency prefix and
//! separators, e.g. "Rp1.000", so only their digits are kept.

use crate::Error;

/// The column holding the transfer amount.
const AMOUNT_COLUMN: usize = 3;

/// The number of transfers in a batch file and their total amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvTotals {
    /// The number of rows after the header.
    pub total_record: u64,
    /// The sum of the amount column, `None` if any row has no digits in it
    /// or the sum overflows.
    pub total_amount: Option<u64>,
}

fn parse_amount(field: Option<&str>) -> Option<u64> {
    let digits: String = field?.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// Count the rows of `contents` and sum their amounts.
///
/// The first line is the header. Blank lines are skipped, every other row
/// counts as a record even if its amount is unusable.
///
/// # Errors
/// Returns [Error::InvalidCSV] if `contents` is not UTF-8 CSV.
pub fn csv_totals(contents: &[u8]) -> Result<CsvTotals, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents);

    let mut totals = CsvTotals {
        total_record: 0,
        total_amount: Some(0),
    };

    for record in reader.records() {
        let record = record
            .inspect_err(|error| tracing::debug!("Could not read CSV record: {error}"))
            .map_err(|error| Error::InvalidCSV(error.to_string()))?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        totals.total_record += 1;
        totals.total_amount = totals
            .total_amount
            .zip(parse_amount(record.get(AMOUNT_COLUMN)))
            .and_then(|(sum, amount)| sum.checked_add(amount));
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CsvTotals, csv_totals};

    #[test]
    fn sums_digits_of_amount_column() {
        let contents = "To Account Bank,To Account No,To Account Name,Amount\n\
            BCA,1234567,Budi,Rp1.000\n\
            BNI,7654321,Siti,Rp2.000\n\
            Mandiri,1112223,Agus,Rp3.000\n";

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(
            got,
            CsvTotals {
                total_record: 3,
                total_amount: Some(6000)
            }
        );
    }

    #[test]
    fn quoted_amounts_with_commas() {
        let contents = "To Account Bank,To Account No,To Account Name,Amount\n\
            BCA,1234567,Budi,\"Rp1,500,000\"\n";

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(got.total_amount, Some(1_500_000));
    }

    #[test]
    fn skips_blank_lines() {
        let contents = "To Account Bank,To Account No,To Account Name,Amount\n\
            BCA,1234567,Budi,1000\n\
            \n\
            BNI,7654321,Siti,2000\n\
            \n";

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(
            got,
            CsvTotals {
                total_record: 2,
                total_amount: Some(3000)
            }
        );
    }

    #[test]
    fn header_only_is_empty_batch() {
        let contents = "To Account Bank,To Account No,To Account Name,Amount\n";

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(
            got,
            CsvTotals {
                total_record: 0,
                total_amount: Some(0)
            }
        );
    }

    #[test]
    fn row_without_amount_still_counts() {
        let contents = "To Account Bank,To Account No,To Account Name,Amount\n\
            BCA,1234567,Budi,1000\n\
            BNI,7654321,Siti\n\
            Mandiri,1112223,Agus,free\n";

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(
            got,
            CsvTotals {
                total_record: 3,
                total_amount: None
            }
        );
    }

    #[test]
    fn overflowing_sum_is_invalid() {
        let contents = format!(
            "To Account Bank,To Account No,To Account Name,Amount\n\
            BCA,1,A,{max}\n\
            BCA,2,B,1\n",
            max = u64::MAX
        );

        let got = csv_totals(contents.as_bytes()).unwrap();

        assert_eq!(got.total_record, 2);
        assert_eq!(got.total_amount, None);
    }

    #[test]
    fn rejects_non_utf8() {
        let contents = b"To Account Bank,To Account No,To Account Name,Amount\n\xff\xfe,1,A,1\n";

        let got = csv_totals(contents);

        assert!(matches!(got, Err(Error::InvalidCSV(_))));
    }
}
