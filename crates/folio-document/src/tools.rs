// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool orchestration. Every tool follows the same shape:
//
//   input bytes -> resolve options (page selection) -> run an operation
//               -> output bytes -> package as an `OutputArtifact`
//
// `Toolbox` covers the tools backed by the in-process document model;
// `EngineTools` covers the ones delegated to an external engine.

use folio_core::config::ToolConfig;
use folio_core::error::{FolioError, Result};
use folio_core::range::{PageSelection, parse_page_number, resolve_sequence};
use folio_core::{DocumentType, InputFile, OutputArtifact, SplitMode};
use tracing::{debug, info, instrument, warn};

use crate::archive::ArchiveBuilder;
use crate::engine::{PdfEngine, Permissions, QpdfArgs};
use crate::pdf::reader::{PageInfo, PdfReader};
use crate::pdf::writer::PdfWriter;

/// Page-level tools over the lopdf document model.
#[derive(Debug, Clone, Default)]
pub struct Toolbox {
    config: ToolConfig,
}

impl Toolbox {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Page sizes, rotations, and paper names.
    pub fn info(&self, input: &InputFile) -> Result<Vec<PageInfo>> {
        Ok(PdfReader::from_bytes(&input.bytes)?.pages())
    }

    #[instrument(skip_all, fields(file = %input.name, mode = ?mode))]
    pub fn split(&self, input: &InputFile, mode: &SplitMode) -> Result<OutputArtifact> {
        let reader = PdfReader::from_bytes(&input.bytes)?;
        let total = reader.page_count();
        let outputs = &self.config.outputs;

        let indices: Vec<usize> = match mode {
            SplitMode::Range(expression) => select(expression, total)?.into_indices(),
            SplitMode::Odd => (0..total).step_by(2).collect(),
            SplitMode::Even => (1..total).step_by(2).collect(),
            SplitMode::EachPage => {
                let all: Vec<usize> = (0..total).collect();
                let bytes = self.archive_pages(&reader, &all, input.stem())?;
                return Ok(OutputArtifact::zip(&outputs.split_archive, bytes));
            }
        };

        if indices.is_empty() {
            return Err(FolioError::NothingSelected);
        }

        info!(total, selected = indices.len(), "Splitting PDF");
        Ok(OutputArtifact::pdf(&outputs.split, reader.select(&indices)?))
    }

    /// Remove the pages named by `expression`.
    #[instrument(skip_all, fields(file = %input.name, expression))]
    pub fn delete_pages(&self, input: &InputFile, expression: &str) -> Result<OutputArtifact> {
        let reader = PdfReader::from_bytes(&input.bytes)?;
        let selection = select(expression, reader.page_count())?;
        let bytes = reader.remove(&selection)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.delete, bytes))
    }

    /// One PDF per selected page, bundled into a ZIP archive.
    #[instrument(skip_all, fields(file = %input.name, expression))]
    pub fn extract_pages(&self, input: &InputFile, expression: &str) -> Result<OutputArtifact> {
        let reader = PdfReader::from_bytes(&input.bytes)?;
        let selection = select(expression, reader.page_count())?;
        let bytes = self.archive_pages(&reader, selection.indices(), input.stem())?;
        Ok(OutputArtifact::zip(&self.config.outputs.extract, bytes))
    }

    /// Rebuild the document in the page order given by `order`
    /// (e.g. "3, 1-2, 2"); pages left out are dropped, repeats duplicate.
    #[instrument(skip_all, fields(file = %input.name, order))]
    pub fn organize(&self, input: &InputFile, order: &str) -> Result<OutputArtifact> {
        let reader = PdfReader::from_bytes(&input.bytes)?;
        let (indices, _rejected) = resolve_sequence(order, reader.page_count());
        if indices.is_empty() {
            return Err(FolioError::NothingSelected);
        }

        let bytes = reader.reorder(&indices)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.organize, bytes))
    }

    /// Add `degrees` to the rotation of the pages named by `expression`
    /// (empty means every page).
    #[instrument(skip_all, fields(file = %input.name, expression, degrees))]
    pub fn rotate(
        &self,
        input: &InputFile,
        expression: &str,
        degrees: i32,
    ) -> Result<OutputArtifact> {
        let reader = PdfReader::from_bytes(&input.bytes)?;
        let selection = select(expression, reader.page_count())?;
        let bytes = reader.rotate(selection.indices(), degrees)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.rotate, bytes))
    }

    /// Concatenate documents in the order given.
    #[instrument(skip_all, fields(files = inputs.len()))]
    pub fn merge(&self, inputs: &[InputFile]) -> Result<OutputArtifact> {
        let (first, rest) = split_first_pair(inputs)?;
        let bytes = PdfReader::from_bytes(&first.bytes)?.merge(&rest)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.merge, bytes))
    }

    /// Interleave documents one page at a time.
    #[instrument(skip_all, fields(files = inputs.len()))]
    pub fn alternate(&self, inputs: &[InputFile]) -> Result<OutputArtifact> {
        let (first, rest) = split_first_pair(inputs)?;
        let bytes = PdfReader::from_bytes(&first.bytes)?.alternate(&rest)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.alternate, bytes))
    }

    /// Insert `count` blank pages after the page typed in `after`
    /// ("0" inserts before the first page).
    #[instrument(skip_all, fields(file = %input.name, after, count))]
    pub fn add_blank_pages(
        &self,
        input: &InputFile,
        after: &str,
        count: usize,
    ) -> Result<OutputArtifact> {
        let position = parse_page_number(after).ok_or_else(|| {
            FolioError::InvalidOption(format!("'{}' is not a page number", after.trim()))
        })?;

        let reader = PdfReader::from_bytes(&input.bytes)?;
        let bytes =
            reader.insert_blank_pages(position, count, self.config.blank_page_fallback)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.blank_pages, bytes))
    }

    /// Remove document metadata.
    #[instrument(skip_all, fields(file = %input.name))]
    pub fn strip_metadata(&self, input: &InputFile) -> Result<OutputArtifact> {
        let bytes = PdfReader::from_bytes(&input.bytes)?.strip_metadata()?;
        Ok(OutputArtifact::pdf(&self.config.outputs.strip_metadata, bytes))
    }

    /// Burn form fields into the page content.
    #[instrument(skip_all, fields(file = %input.name))]
    pub fn flatten(&self, input: &InputFile) -> Result<OutputArtifact> {
        let bytes = PdfReader::from_bytes(&input.bytes)?.flatten_forms()?;
        Ok(OutputArtifact::pdf(&self.config.outputs.flatten, bytes))
    }

    /// One page per image, each page sized to its image.
    #[instrument(skip_all, fields(files = images.len()))]
    pub fn images_to_pdf(&self, images: &[InputFile]) -> Result<OutputArtifact> {
        if let Some(other) = images.iter().find(|image| {
            matches!(
                image.document_type(),
                Some(DocumentType::Pdf | DocumentType::Zip)
            )
        }) {
            return Err(FolioError::UnsupportedDocument(other.name.clone()));
        }

        let slices: Vec<&[u8]> = images.iter().map(|image| image.bytes.as_slice()).collect();
        let mut writer = PdfWriter::new();
        if let Some(first) = images.first() {
            writer.set_title(first.stem());
        }
        let bytes = writer.create_from_images(&slices)?;
        Ok(OutputArtifact::pdf(&self.config.outputs.images, bytes))
    }

    /// Bundle files unchanged into one ZIP archive.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn bundle(&self, files: &[InputFile]) -> Result<OutputArtifact> {
        if files.is_empty() {
            return Err(FolioError::InvalidOption("select at least one file".into()));
        }

        let mut archive = ArchiveBuilder::new(self.config.archive_compression);
        for file in files {
            archive.add(&file.name, &file.bytes)?;
        }
        Ok(OutputArtifact::zip(&self.config.outputs.bundle, archive.finish()?))
    }

    fn archive_pages(&self, reader: &PdfReader, indices: &[usize], stem: &str) -> Result<Vec<u8>> {
        let mut archive = ArchiveBuilder::new(self.config.archive_compression);
        for (&index, page) in indices.iter().zip(reader.extract_each(indices)?) {
            archive.add(&format!("{}-page-{}.pdf", stem, index + 1), &page)?;
        }
        info!(pages = archive.len(), "Pages archived");
        archive.finish()
    }
}

/// Resolve a page-range expression; an empty result is "nothing selected".
fn select(expression: &str, total_pages: usize) -> Result<PageSelection> {
    let selection = PageSelection::parse(expression, total_pages);

    debug!(
        selected = selection.len(),
        rejected = selection.rejected().len(),
        "Page selection resolved"
    );
    if selection.is_empty() {
        return Err(FolioError::NothingSelected);
    }

    Ok(selection)
}

fn split_first_pair(inputs: &[InputFile]) -> Result<(&InputFile, Vec<&[u8]>)> {
    match inputs {
        [first, rest @ ..] if !rest.is_empty() => Ok((
            first,
            rest.iter().map(|input| input.bytes.as_slice()).collect(),
        )),
        _ => Err(FolioError::InvalidOption(
            "select at least two PDF files".into(),
        )),
    }
}

// -- Engine-backed tools ------------------------------------------------------

/// Outcome of a batch run where individual files may fail.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    /// File name and error for every file that failed.
    pub failed: Vec<(String, FolioError)>,
}

/// Tools delegated to an external engine. The engine must already be
/// initialised; these tools never start or stop it.
pub struct EngineTools<'a, E: PdfEngine> {
    engine: &'a E,
    config: &'a ToolConfig,
}

impl<'a, E: PdfEngine> EngineTools<'a, E> {
    pub fn new(engine: &'a E, config: &'a ToolConfig) -> Self {
        Self { engine, config }
    }

    /// AES-encrypt. A user password is required; the owner password is
    /// optional and, when distinct, applies every restriction.
    pub async fn encrypt(
        &self,
        input: &InputFile,
        user_password: &str,
        owner_password: Option<&str>,
    ) -> Result<OutputArtifact> {
        if user_password.is_empty() {
            return Err(FolioError::InvalidOption("a user password is required".into()));
        }
        if owner_password.is_none_or(str::is_empty) {
            info!(file = %input.name, "No distinct owner password; the PDF will have no usage restrictions");
        }

        let args = QpdfArgs::encrypt(user_password, owner_password, self.config.encryption_bits);
        self.run_single(input, &args, &self.config.outputs.encrypt_prefix)
            .await
    }

    pub async fn decrypt(&self, input: &InputFile, password: &str) -> Result<OutputArtifact> {
        if password.is_empty() {
            return Err(FolioError::InvalidOption("the current password is required".into()));
        }

        let args = QpdfArgs::decrypt(password);
        self.run_single(input, &args, &self.config.outputs.decrypt_prefix)
            .await
    }

    /// Re-encrypt with new passwords and permissions; with no new passwords
    /// the document is decrypted instead.
    pub async fn change_permissions(
        &self,
        input: &InputFile,
        current_password: Option<&str>,
        new_user_password: &str,
        new_owner_password: &str,
        permissions: &Permissions,
    ) -> Result<OutputArtifact> {
        let args = QpdfArgs::change_permissions(
            current_password,
            new_user_password,
            new_owner_password,
            permissions,
            self.config.encryption_bits,
        );
        self.run_single(input, &args, &self.config.outputs.permissions_prefix)
            .await
    }

    pub async fn remove_restrictions(
        &self,
        input: &InputFile,
        password: Option<&str>,
    ) -> Result<OutputArtifact> {
        let args = QpdfArgs::remove_restrictions(password);
        self.run_single(input, &args, &self.config.outputs.unrestrict_prefix)
            .await
    }

    /// Linearize every PDF among `inputs`. A failing file is recorded in the
    /// report and does not stop the batch; the batch fails only when no file
    /// succeeds.
    #[instrument(skip_all, fields(files = inputs.len()))]
    pub async fn linearize(&self, inputs: &[InputFile]) -> Result<(OutputArtifact, BatchReport)> {
        let pdfs: Vec<&InputFile> = inputs
            .iter()
            .filter(|input| input.document_type() == Some(DocumentType::Pdf))
            .collect();
        if pdfs.is_empty() {
            return Err(FolioError::InvalidOption("select at least one PDF file".into()));
        }

        let args = QpdfArgs::linearize();
        let mut archive = ArchiveBuilder::new(self.config.archive_compression);
        let mut report = BatchReport::default();

        for (position, input) in pdfs.iter().enumerate() {
            info!(file = %input.name, "Linearizing {}/{}", position + 1, pdfs.len());
            match self.engine.run(&input.name, &input.bytes, &args).await {
                Ok(bytes) => {
                    let name = format!("{}{}", self.config.outputs.linearize_prefix, input.name);
                    archive.add(&name, &bytes)?;
                    report.succeeded += 1;
                }
                Err(err) => {
                    warn!(file = %input.name, %err, "Linearization failed");
                    report.failed.push((input.name.clone(), err));
                }
            }
        }

        if report.succeeded == 0 {
            return Err(FolioError::Engine(format!(
                "none of the {} files could be linearized",
                pdfs.len()
            )));
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "Linearization batch complete"
        );
        let artifact = OutputArtifact::zip(&self.config.outputs.linearize, archive.finish()?);
        Ok((artifact, report))
    }

    async fn run_single(
        &self,
        input: &InputFile,
        args: &QpdfArgs,
        prefix: &str,
    ) -> Result<OutputArtifact> {
        let bytes = self.engine.run(&input.name, &input.bytes, args).await?;
        Ok(OutputArtifact::pdf(format!("{}{}", prefix, input.name), bytes))
    }
}
