//! Where `mk` reads its template from.

use std::io::Read;

use log::warn;
use sfm_core::error::{Error, Result};
use sfm_core::file_handling::read_template;
use sfm_core::template::Template;

const S3_SCHEME: &str = "s3://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(String),
    S3 { bucket: String, key: String },
    Stdin,
}

impl TemplateSource {
    /// Parses a `-t` value: an `s3://bucket/key` URI or a local path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateSource`] for an S3 URI without a bucket or key.
    pub fn parse(location: &str) -> Result<Self> {
        let Some(rest) = location.strip_prefix(S3_SCHEME) else {
            return Ok(Self::File(location.to_string()));
        };

        match rest.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            _ => Err(Error::TemplateSource {
                location: location.to_string(),
                reason: "expected s3://<bucket>/<key>".to_string(),
            }),
        }
    }

    /// Picks the source from the `-t` flag and whether stdin is piped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] when there is neither a flag nor a pipe, and
    /// the errors of [`TemplateSource::parse`].
    pub fn select(template_arg: Option<&str>, stdin_piped: bool) -> Result<Self> {
        match template_arg {
            Some(location) => {
                if stdin_piped {
                    warn!("Using template `{location}`; ignoring stdin");
                }
                Self::parse(location)
            }
            None if stdin_piped => Ok(Self::Stdin),
            None => Err(Error::Usage(
                "No template flag supplied and no pipe on stdin".to_string(),
            )),
        }
    }

    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::File(path) => path.clone(),
            Self::S3 { bucket, key } => format!("{S3_SCHEME}{bucket}/{key}"),
            Self::Stdin => "stdin".to_string(),
        }
    }
}

fn unreadable(source: &TemplateSource, reason: impl ToString) -> Error {
    Error::TemplateSource {
        location: source.location(),
        reason: reason.to_string(),
    }
}

/// Reads and parses the template.
///
/// `fetch_object` downloads an S3 object given its bucket and key, failing
/// with a readable reason.
///
/// # Errors
///
/// Returns [`Error::TemplateSource`] when the template cannot be read and
/// [`Error::Template`] when it cannot be parsed.
pub fn load<F>(source: &TemplateSource, stdin: &mut dyn Read, fetch_object: F) -> Result<Template>
where
    F: FnOnce(&str, &str) -> std::result::Result<Vec<u8>, String>,
{
    let bytes = match source {
        TemplateSource::File(path) => {
            return read_template(path).map_err(|e| match e {
                Error::Io { original, .. } => unreadable(source, original),
                other => other,
            });
        }
        TemplateSource::S3 { bucket, key } => {
            fetch_object(bucket, key).map_err(|e| unreadable(source, e))?
        }
        TemplateSource::Stdin => {
            let mut bytes = Vec::new();
            stdin
                .read_to_end(&mut bytes)
                .map_err(|e| unreadable(source, e))?;
            bytes
        }
    };

    let body = String::from_utf8(bytes).map_err(|e| unreadable(source, e))?;
    Template::parse(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const BODY: &str = "Parameters:\n  Env:\n    Type: String\nResources: {}\n";

    fn no_s3(_: &str, _: &str) -> std::result::Result<Vec<u8>, String> {
        panic!("S3 should not be used")
    }

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            TemplateSource::parse("app.yml").unwrap(),
            TemplateSource::File("app.yml".to_string())
        );
        assert_eq!(
            TemplateSource::parse("s3://bucket/stacks/app.yml").unwrap(),
            TemplateSource::S3 {
                bucket: "bucket".to_string(),
                key: "stacks/app.yml".to_string(),
            }
        );
        assert!(TemplateSource::parse("s3://bucket").is_err());
        assert!(TemplateSource::parse("s3:///key").is_err());
    }

    #[test]
    fn test_select() {
        assert_eq!(
            TemplateSource::select(Some("app.yml"), true).unwrap(),
            TemplateSource::File("app.yml".to_string())
        );
        assert_eq!(TemplateSource::select(None, true).unwrap(), TemplateSource::Stdin);
        assert!(matches!(
            TemplateSource::select(None, false),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{BODY}").unwrap();
        let source = TemplateSource::File(temp_file.path().to_str().unwrap().to_string());

        let template = load(&source, &mut Cursor::new(Vec::new()), no_s3).unwrap();
        assert!(template.declares("Env"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let source = TemplateSource::File("/nonexistent/app.yml".to_string());

        let result = load(&source, &mut Cursor::new(Vec::new()), no_s3);
        assert!(matches!(result, Err(Error::TemplateSource { .. })));
    }

    #[test]
    fn test_load_from_stdin() {
        let template = load(
            &TemplateSource::Stdin,
            &mut Cursor::new(BODY.as_bytes().to_vec()),
            no_s3,
        )
        .unwrap();
        assert_eq!(template.body(), BODY);
    }

    #[test]
    fn test_load_from_s3() {
        let source = TemplateSource::parse("s3://bucket/app.yml").unwrap();

        let template = load(&source, &mut Cursor::new(Vec::new()), |bucket, key| {
            assert_eq!((bucket, key), ("bucket", "app.yml"));
            Ok(BODY.as_bytes().to_vec())
        })
        .unwrap();
        assert!(template.declares("Env"));
    }

    #[test]
    fn test_unparseable_template() {
        let result = load(
            &TemplateSource::Stdin,
            &mut Cursor::new(b"- just\n- a list\n".to_vec()),
            no_s3,
        );
        assert!(matches!(result, Err(Error::Template(_))));
    }
}
