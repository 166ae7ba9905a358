use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::engine::{OcrEngine, OcrError, OcrInput, OcrOutput};
use crate::region::{BoundingBox, TextRegion};

/// Tesseract TSV rows at this level are single words.
const WORD_LEVEL: &str = "5";

/// How the `tesseract` executable is invoked.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub binary: PathBuf,
    /// Page segmentation mode; 7 treats the image as a single text line.
    pub psm: u8,
    pub whitelist: Option<String>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            psm: 7,
            whitelist: Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()),
        }
    }
}

/// OCR backed by the `tesseract` command line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn command(&self, source: &str) -> Command {
        let mut command = Command::new(&self.config.binary);
        command
            .arg(source)
            .arg("stdout")
            .arg("--psm")
            .arg(self.config.psm.to_string());
        if let Some(whitelist) = &self.config.whitelist {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={whitelist}"));
        }
        command
            .arg("tsv")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    async fn run(&self, source: &str, stdin_bytes: Option<Vec<u8>>) -> Result<String, OcrError> {
        let mut command = self.command(source);
        command.stdin(if stdin_bytes.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command.spawn()?;
        if let (Some(bytes), Some(mut stdin)) = (stdin_bytes, child.stdin.take()) {
            stdin.write_all(&bytes).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OcrError::EngineError(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(TesseractConfig::default())
    }
}

fn encode_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>, OcrError> {
    let image = image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| OcrError::InvalidInput(format!("buffer does not fit {width}x{height}")))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| OcrError::EngineError(e.to_string()))?;
    Ok(bytes)
}

/// Parses `tesseract ... tsv` output into candidates.
///
/// Every recognized word becomes a candidate in the order tesseract printed
/// it. Lines holding more than one word are appended afterwards as a single
/// space-joined candidate carrying the mean word confidence.
pub fn parse_tsv(tsv: &str) -> Vec<TextRegion> {
    let mut words = Vec::new();
    let mut lines: Vec<((u32, u32, u32), Vec<TextRegion>)> = Vec::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != WORD_LEVEL {
            continue;
        }
        let confidence = match cols[10].trim().parse::<f32>() {
            Ok(conf) if conf >= 0.0 => conf / 100.0,
            _ => continue,
        };
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let num = |i: usize| cols[i].trim().parse::<f32>().ok();
        let bounding_box = match (num(6), num(7), num(8), num(9)) {
            (Some(x), Some(y), Some(width), Some(height)) => Some(BoundingBox {
                x,
                y,
                width,
                height,
            }),
            _ => None,
        };
        let region = TextRegion {
            text: text.to_string(),
            bounding_box,
            confidence: Some(confidence),
        };

        let key = (
            cols[2].trim().parse().unwrap_or(0),
            cols[3].trim().parse().unwrap_or(0),
            cols[4].trim().parse().unwrap_or(0),
        );
        match lines.iter_mut().find(|(k, _)| *k == key) {
            Some((_, line)) => line.push(region.clone()),
            None => lines.push((key, vec![region.clone()])),
        }
        words.push(region);
    }

    for (_, line) in lines {
        if line.len() > 1 {
            words.push(join_line(&line));
        }
    }
    words
}

fn join_line(line: &[TextRegion]) -> TextRegion {
    let text = line
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let confidence =
        line.iter().filter_map(|w| w.confidence).sum::<f32>() / line.len() as f32;
    let bounding_box = line
        .iter()
        .filter_map(|w| w.bounding_box)
        .reduce(|acc, b| acc.union(&b));
    TextRegion {
        text,
        bounding_box,
        confidence: Some(confidence),
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError> {
        let tsv = match input {
            OcrInput::FilePath(path) => {
                let path = path
                    .to_str()
                    .ok_or_else(|| OcrError::InvalidInput(format!("{path:?} is not UTF-8")))?;
                self.run(path, None).await?
            }
            OcrInput::Bytes(data) => self.run("stdin", Some(data.clone())).await?,
            OcrInput::Luma {
                width,
                height,
                pixels,
            } => {
                let png = encode_png(*width, *height, pixels)?;
                self.run("stdin", Some(png)).await?
            }
        };

        let regions = parse_tsv(&tsv);
        debug!("tesseract returned {} candidates", regions.len());
        Ok(OcrOutput::from_regions(regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_single_word() {
        let tsv = format!(
            "{HEADER}\n1\t1\t0\t0\t0\t0\t0\t0\t120\t40\t-1\t\n5\t1\t1\t1\t1\t1\t4\t6\t110\t30\t91.5\tAB12CDE\n"
        );
        let regions = parse_tsv(&tsv);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "AB12CDE");
        assert!((regions[0].confidence.unwrap() - 0.915).abs() < 1e-6);
        assert_eq!(
            regions[0].bounding_box,
            Some(BoundingBox { x: 4.0, y: 6.0, width: 110.0, height: 30.0 })
        );
    }

    #[test]
    fn test_parse_appends_joined_line_after_words() {
        let tsv = format!(
            "{HEADER}\n5\t1\t1\t1\t1\t1\t0\t0\t50\t30\t80\tAB12\n5\t1\t1\t1\t1\t2\t60\t0\t40\t30\t60\tCDE\n"
        );
        let regions = parse_tsv(&tsv);
        let texts: Vec<&str> = regions.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["AB12", "CDE", "AB12 CDE"]);
        assert!((regions[2].confidence.unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            regions[2].bounding_box,
            Some(BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 30.0 })
        );
    }

    #[test]
    fn test_parse_skips_blank_and_unconfident_rows() {
        let tsv = format!(
            "{HEADER}\n5\t1\t1\t1\t1\t1\t0\t0\t50\t30\t-1\tXX\n5\t1\t1\t1\t1\t2\t0\t0\t50\t30\t75\t \nshort\trow\n"
        );
        assert!(parse_tsv(&tsv).is_empty());
    }

    #[test]
    fn test_encode_png_roundtrips_dimensions() {
        let png = encode_png(3, 2, &[0, 255, 0, 255, 0, 255]).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let engine = TesseractEngine::new(TesseractConfig {
            binary: PathBuf::from("/nonexistent/tesseract-binary"),
            ..TesseractConfig::default()
        });
        let input = OcrInput::luma(1, 1, vec![0]).unwrap();
        let err = engine.recognize(&input).await.unwrap_err();
        assert!(matches!(err, OcrError::Io(_)));
    }
}
