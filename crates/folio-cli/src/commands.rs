// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command dispatch: read inputs, run one tool, write the artifact.

use std::path::{Path, PathBuf};

use folio_core::error::Result;
use folio_core::{InputFile, OutputArtifact, ToolConfig};
use folio_document::{EngineTools, PageInfo, QpdfEngine, Toolbox};
use tracing::{info, warn};

use crate::cli::{Cli, Commands};
use crate::config_dir;

/// Run the parsed command line to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config_dir::config_file);
    let config = ToolConfig::load_or_default(&config_path);
    let toolbox = Toolbox::new(config.clone());

    let artifact = match cli.command {
        Commands::Info { file, json } => {
            let pages = toolbox.info(&read_input(&file)?)?;
            print_info(&pages, json)?;
            return Ok(());
        }
        Commands::Config { write } => {
            if write {
                config.save(&config_path)?;
                info!(path = %config_path.display(), "Configuration written");
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }

        Commands::Split { file, mode, pages } => {
            toolbox.split(&read_input(&file)?, &mode.into_mode(pages))?
        }
        Commands::Delete { file, pages } => toolbox.delete_pages(&read_input(&file)?, &pages)?,
        Commands::Extract { file, pages } => toolbox.extract_pages(&read_input(&file)?, &pages)?,
        Commands::Organize { file, order } => toolbox.organize(&read_input(&file)?, &order)?,
        Commands::Rotate {
            file,
            degrees,
            pages,
        } => toolbox.rotate(&read_input(&file)?, &pages, degrees)?,
        Commands::Merge { files } => toolbox.merge(&read_inputs(&files)?)?,
        Commands::Alternate { files } => toolbox.alternate(&read_inputs(&files)?)?,
        Commands::Blank { file, after, count } => {
            toolbox.add_blank_pages(&read_input(&file)?, &after, count)?
        }
        Commands::StripMetadata { file } => toolbox.strip_metadata(&read_input(&file)?)?,
        Commands::Flatten { file } => toolbox.flatten(&read_input(&file)?)?,
        Commands::Images { files } => toolbox.images_to_pdf(&read_inputs(&files)?)?,
        Commands::Zip { files } => toolbox.bundle(&read_inputs(&files)?)?,

        Commands::Encrypt {
            file,
            user_password,
            owner_password,
        } => {
            let engine = start_engine(&config).await?;
            EngineTools::new(&engine, &config)
                .encrypt(&read_input(&file)?, &user_password, owner_password.as_deref())
                .await?
        }
        Commands::Decrypt { file, password } => {
            let engine = start_engine(&config).await?;
            EngineTools::new(&engine, &config)
                .decrypt(&read_input(&file)?, &password)
                .await?
        }
        Commands::Permissions {
            file,
            password,
            new_user_password,
            new_owner_password,
            deny,
        } => {
            let engine = start_engine(&config).await?;
            EngineTools::new(&engine, &config)
                .change_permissions(
                    &read_input(&file)?,
                    password.as_deref(),
                    &new_user_password,
                    &new_owner_password,
                    &deny.into(),
                )
                .await?
        }
        Commands::Unrestrict { file, password } => {
            let engine = start_engine(&config).await?;
            EngineTools::new(&engine, &config)
                .remove_restrictions(&read_input(&file)?, password.as_deref())
                .await?
        }
        Commands::Linearize { files } => {
            let engine = start_engine(&config).await?;
            let (artifact, report) = EngineTools::new(&engine, &config)
                .linearize(&read_inputs(&files)?)
                .await?;
            for (name, err) in &report.failed {
                eprintln!("{name}: {err}");
            }
            eprintln!(
                "{} of {} files linearized",
                report.succeeded,
                report.succeeded + report.failed.len()
            );
            artifact
        }
    };

    let path = write_artifact(&artifact, cli.output.as_deref())?;
    println!("{}", path.display());
    Ok(())
}

async fn start_engine(config: &ToolConfig) -> Result<QpdfEngine> {
    let mut engine = QpdfEngine::new(config.qpdf_path.clone());
    engine.init().await?;
    Ok(engine)
}

/// Read a file, naming it by its final path component.
fn read_input(path: &Path) -> Result<InputFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(InputFile::new(name, bytes))
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    paths.iter().map(|path| read_input(path)).collect()
}

/// Write an artifact to `output`, into `output` when it is a directory, or
/// under its own name in the working directory when no output is given.
fn write_artifact(artifact: &OutputArtifact, output: Option<&Path>) -> Result<PathBuf> {
    let path = match output {
        Some(dir) if dir.is_dir() => dir.join(&artifact.file_name),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(&artifact.file_name),
    };

    if path.exists() {
        warn!(path = %path.display(), "Overwriting existing file");
    }
    std::fs::write(&path, &artifact.bytes)?;
    info!(
        path = %path.display(),
        bytes = artifact.bytes.len(),
        mime = artifact.mime_type(),
        "Output written"
    );
    Ok(path)
}

fn print_info(pages: &[PageInfo], json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                serde_json::json!({
                    "page": page.number,
                    "width_pt": page.width_pt,
                    "height_pt": page.height_pt,
                    "rotation": page.rotation,
                    "paper": page.paper.name(),
                })
            })
            .collect();
        let report = serde_json::json!({ "page_count": pages.len(), "pages": entries });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} pages", pages.len());
    for page in pages {
        println!(
            "{:>5}  {:>7.1} x {:<7.1} pt  {:<8} {:>3}°",
            page.number,
            page.width_pt,
            page.height_pt,
            page.paper.name(),
            page.rotation
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;

    #[test]
    fn input_is_named_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let input = read_input(&path).unwrap();
        assert_eq!(input.name, "report.pdf");
        assert_eq!(input.bytes, b"%PDF");
    }

    #[test]
    fn missing_input_is_io_error() {
        let result = read_input(Path::new("/nonexistent/folio/input.pdf"));
        assert!(matches!(result, Err(folio_core::FolioError::Io(_))));
    }

    #[test]
    fn artifact_lands_inside_directory_output() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = OutputArtifact::pdf("merged.pdf", b"data".to_vec());

        let path = write_artifact(&artifact, Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("merged.pdf"));
        assert_eq!(std::fs::read(path).unwrap(), b"data");
    }

    #[test]
    fn artifact_uses_explicit_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("custom.zip");
        let artifact = OutputArtifact::zip("pdfs.zip", b"zip".to_vec());

        assert_eq!(write_artifact(&artifact, Some(&target)).unwrap(), target);
    }

    #[tokio::test]
    async fn zip_command_writes_archive() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.pdf");
        let second = dir.path().join("b.pdf");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"two").unwrap();
        let config = dir.path().join("config.json");
        let output = dir.path().join("bundle.zip");

        let cli = Cli::parse_from([
            OsStr::new("folio"),
            OsStr::new("zip"),
            first.as_os_str(),
            second.as_os_str(),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ]);
        run(cli).await.unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn config_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("nested").join("config.json");

        let cli = Cli::parse_from([
            OsStr::new("folio"),
            OsStr::new("config"),
            OsStr::new("--write"),
            OsStr::new("--config"),
            config.as_os_str(),
        ]);
        run(cli).await.unwrap();

        assert_eq!(ToolConfig::load_or_default(&config), ToolConfig::default());
    }
}
