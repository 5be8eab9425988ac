//! Reading and checking the batch upload form.

use axum::extract::{Multipart, multipart::Field};

use crate::{
    Error,
    batch::csv::{CsvTotals, csv_totals},
};

pub const FILE_REQUIRED_MSG: &str = "Please upload a file.";
pub const FILE_NOT_CSV_MSG: &str = "Please upload a CSV file.";
pub const FILE_UNREADABLE_MSG: &str = "The file could not be read as CSV.";
pub const INSTRUCTION_TYPE_MSG: &str = "Please select an instruction type.";
pub const RECORD_MISMATCH_MSG: &str = "The total record does not match the total transfer record.";
pub const AMOUNT_MISMATCH_MSG: &str = "The total upload amount does not match the total amount.";

/// The instruction types a user can pick.
pub const INSTRUCTION_TYPES: [&str; 2] = ["Immediate", "Standing Instruction"];

/// A file from the upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub contents: Vec<u8>,
}

impl UploadedFile {
    fn is_csv(&self) -> bool {
        self.content_type.as_deref() == Some("text/csv")
            || self.file_name.to_ascii_lowercase().ends_with(".csv")
    }
}

/// The raw fields of the upload form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchForm {
    pub file: Option<UploadedFile>,
    pub instruction_type: String,
    pub total_record: String,
    pub total_amount: String,
}

/// The inline messages for each field of the upload form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchErrors {
    pub file: Option<&'static str>,
    pub instruction_type: Option<&'static str>,
    pub record: Option<&'static str>,
    pub amount: Option<&'static str>,
}

/// An upload form that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBatch {
    pub file: UploadedFile,
    pub instruction_type: String,
    pub total_record: u64,
    pub total_amount: u64,
}

async fn read_text(field: Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .inspect_err(|error| tracing::error!("Could not read multipart form field: {error}"))
        .map_err(|error| Error::MultipartError(error.body_text()))
}

async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().map(str::to_owned);

    let contents = field
        .bytes()
        .await
        .inspect_err(|error| tracing::error!("Could not read uploaded file: {error}"))
        .map_err(|error| Error::MultipartError(error.body_text()))?;

    // Browsers send an empty part when no file was chosen.
    if file_name.is_empty() && contents.is_empty() {
        return Ok(None);
    }

    tracing::debug!(
        "Received file '{file_name}' that is {} bytes",
        contents.len()
    );

    Ok(Some(UploadedFile {
        file_name,
        content_type,
        contents: contents.to_vec(),
    }))
}

/// Read the upload form fields from `multipart`. Unknown fields are ignored.
///
/// # Errors
/// Returns [Error::MultipartError] if the body is not a well formed multipart form.
pub async fn parse_batch_form(mut multipart: Multipart) -> Result<BatchForm, Error> {
    let mut form = BatchForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .inspect_err(|error| tracing::error!("Could not read multipart form: {error}"))
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        match field.name() {
            Some("file") => form.file = read_file(field).await?,
            Some("instruction_type") => form.instruction_type = read_text(field).await?,
            Some("total_record") => form.total_record = read_text(field).await?,
            Some("total_amount") => form.total_amount = read_text(field).await?,
            name => tracing::debug!("Ignoring unexpected multipart field {name:?}"),
        }
    }

    Ok(form)
}

/// Read a whole number typed into the form. A zero fraction such as
/// "6000.00" is accepted.
fn parse_entered(value: &str) -> Option<u64> {
    let value = value.trim();
    let whole = match value.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|digit| digit == b'0') => whole,
        Some(_) => return None,
        None => value,
    };

    whole.parse().ok()
}

impl BatchForm {
    /// Run the four independent checks on the form.
    ///
    /// The file must be a readable CSV, the instruction type one of
    /// [INSTRUCTION_TYPES], and the entered record count and amount must equal
    /// the ones counted in the file.
    pub fn validate(self) -> Result<ValidBatch, BatchErrors> {
        let mut errors = BatchErrors::default();

        let totals = match &self.file {
            None => {
                errors.file = Some(FILE_REQUIRED_MSG);
                CsvTotals::default()
            }
            Some(file) if !file.is_csv() => {
                errors.file = Some(FILE_NOT_CSV_MSG);
                CsvTotals::default()
            }
            Some(file) => csv_totals(&file.contents).unwrap_or_else(|error| {
                tracing::debug!("Could not count batch '{}': {error}", file.file_name);
                errors.file = Some(FILE_UNREADABLE_MSG);
                CsvTotals::default()
            }),
        };

        if !INSTRUCTION_TYPES.contains(&self.instruction_type.as_str()) {
            errors.instruction_type = Some(INSTRUCTION_TYPE_MSG);
        }

        let total_record = parse_entered(&self.total_record);
        if total_record != Some(totals.total_record) {
            errors.record = Some(RECORD_MISMATCH_MSG);
        }

        let total_amount = parse_entered(&self.total_amount);
        if totals.total_amount.is_none() || total_amount != totals.total_amount {
            errors.amount = Some(AMOUNT_MISMATCH_MSG);
        }

        match (self.file, total_record, total_amount) {
            (Some(file), Some(total_record), Some(total_amount)) if errors == BatchErrors::default() => {
                Ok(ValidBatch {
                    file,
                    instruction_type: self.instruction_type,
                    total_record,
                    total_amount,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_multipart {
    use axum::{
        extract::{FromRequest, Multipart, Request},
        http::header::CONTENT_TYPE,
    };

    use crate::endpoints;

    pub(crate) const BOUNDARY: &str = "MY_BOUNDARY123456789";

    pub(crate) const BATCH_CSV: &str = "To Account Bank,To Account No,To Account Name,Amount\n\
        BCA,1234567,Budi,Rp1.000\n\
        BNI,7654321,Siti,Rp2.000\n\
        Mandiri,1112223,Agus,Rp3.000\n";

    /// Build the body of a batch upload form. `file` is the file name,
    /// content type and contents.
    pub(crate) fn batch_form_body(
        file: Option<(&str, &str, &str)>,
        instruction_type: Option<&str>,
        total_record: &str,
        total_amount: &str,
    ) -> Vec<u8> {
        let boundary_start = format!("--{BOUNDARY}");
        let boundary_end = format!("--{BOUNDARY}--");

        let mut lines: Vec<String> = Vec::new();

        if let Some((file_name, content_type, contents)) = file {
            lines.push(boundary_start.clone());
            lines.push(format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\""
            ));
            lines.push(format!("Content-Type: {content_type}"));
            lines.push("".to_owned());
            lines.push(contents.to_owned());
        }

        let mut push_text = |name: &str, value: &str| {
            lines.push(boundary_start.clone());
            lines.push(format!("Content-Disposition: form-data; name=\"{name}\""));
            lines.push("".to_owned());
            lines.push(value.to_owned());
        };

        if let Some(instruction_type) = instruction_type {
            push_text("instruction_type", instruction_type);
        }
        push_text("total_record", total_record);
        push_text("total_amount", total_amount);

        lines.push(boundary_end);

        lines.join("\r\n").into_bytes()
    }

    pub(crate) fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub(crate) async fn must_make_multipart(body: Vec<u8>) -> Multipart {
        let request = Request::builder()
            .method("POST")
            .uri(endpoints::BATCHES)
            .header(CONTENT_TYPE, content_type())
            .body(body.into())
            .unwrap();

        Multipart::from_request(request, &{}).await.unwrap()
    }

    pub(crate) fn valid_batch_body() -> Vec<u8> {
        batch_form_body(
            Some(("batch.csv", "text/csv", BATCH_CSV)),
            Some("Immediate"),
            "3",
            "6000",
        )
    }
}
