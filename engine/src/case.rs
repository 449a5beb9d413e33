//! Loaded test cases
//!
//! A [`TestCase`] is a validated descriptor together with the text of the two
//! templates it references. Template paths resolve against the directory of
//! the descriptor file.

use shared::TestCaseDescriptor;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::traits::CaseSource;

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub descriptor: TestCaseDescriptor,
    pub request_template: String,
    pub response_template: String,
    /// Descriptor file the case was loaded from, if any
    pub origin: Option<PathBuf>,
}

impl TestCase {
    pub fn new(
        descriptor: TestCaseDescriptor,
        request_template: impl Into<String>,
        response_template: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            request_template: request_template.into(),
            response_template: response_template.into(),
            origin: None,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Read a descriptor and both templates through `source`
    pub async fn load<S>(source: &S, descriptor_path: &Path) -> EngineResult<Self>
    where
        S: CaseSource + ?Sized,
    {
        let text = source.read_text(descriptor_path).await?;
        let descriptor = TestCaseDescriptor::from_json(&text).map_err(|e| {
            EngineError::malformed(&format!("descriptor {}", descriptor_path.display()), e.to_string())
        })?;

        let base = descriptor_path.parent().unwrap_or_else(|| Path::new(""));
        let request_template = source
            .read_text(&base.join(&descriptor.template_data.template_path))
            .await?;
        let response_template = source
            .read_text(&base.join(&descriptor.messaging.reply.response_template_path))
            .await?;

        tracing::debug!(
            "📄 Loaded case '{}' from {}",
            descriptor.name(),
            descriptor_path.display()
        );

        Ok(Self {
            descriptor,
            request_template,
            response_template,
            origin: Some(descriptor_path.to_path_buf()),
        })
    }
}
