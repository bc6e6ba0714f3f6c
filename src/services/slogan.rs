//! Slogan derivation: text-generation collaborator first, catalog templates as fallback.

use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::warn;

use crate::{
    catalog::{Catalog, StyleBucket},
    dao::slogan_writer::SloganWriter,
    error::{FallbackReason, Fallible},
    state::brand::BusinessDescriptor,
};

/// Longest slogan accepted from the collaborator, in characters.
const MAX_SLOGAN_CHARS: usize = 120;

/// Produces one slogan per bundle.
#[derive(Clone)]
pub struct SloganService {
    writer: Option<Arc<dyn SloganWriter>>,
    timeout: Duration,
}

impl SloganService {
    /// `writer` may be absent, in which case only templates are used.
    pub fn new(writer: Option<Arc<dyn SloganWriter>>, timeout: Duration) -> Self {
        Self { writer, timeout }
    }

    /// Slogan for `descriptor` in the voice of `bucket`.
    pub async fn slogan(
        &self,
        catalog: &Catalog,
        bucket: StyleBucket,
        descriptor: &BusinessDescriptor,
    ) -> String {
        let Some(writer) = &self.writer else {
            return template_slogan(catalog, bucket, &descriptor.name);
        };

        let prompt = slogan_prompt(catalog, bucket, descriptor);
        let generated: Fallible<String> = match timeout(self.timeout, writer.write(&prompt)).await {
            Ok(Ok(text)) => clean_slogan(&text).ok_or(FallbackReason::NoCandidates),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(FallbackReason::Timeout),
        };

        generated.unwrap_or_else(|reason| {
            warn!(%reason, "slogan generation failed; using template");
            template_slogan(catalog, bucket, &descriptor.name)
        })
    }
}

/// Prompt asking for one short slogan in the tone of `bucket`.
pub fn slogan_prompt(
    catalog: &Catalog,
    bucket: StyleBucket,
    descriptor: &BusinessDescriptor,
) -> String {
    let style = catalog.style(bucket);
    let label = style.labels.first().map(String::as_str).unwrap_or(bucket.as_str());
    let mut prompt = format!(
        "Write one slogan for the business \"{}\". Style: {label}. Tone: {}.",
        descriptor.name.trim(),
        style.tone.tone
    );
    let subject = descriptor.subject_text();
    if !subject.is_empty() {
        prompt.push_str(&format!(" What they do: {subject}."));
    }
    prompt.push_str(
        " Reply with the slogan only, at most eight words, in the language of the description, \
         without quotes.",
    );
    prompt
}

/// Keep the first non-empty line, strip wrapping quotes and reject overlong answers.
pub fn clean_slogan(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '«' | '»' | '“' | '”'))
        .trim();
    if line.is_empty() || line.chars().count() > MAX_SLOGAN_CHARS {
        return None;
    }
    Some(line.to_string())
}

/// Deterministic template slogan: the template is chosen by the business name.
pub fn template_slogan(catalog: &Catalog, bucket: StyleBucket, business_name: &str) -> String {
    let name = business_name.trim();
    let templates = &catalog.style(bucket).slogans;
    if templates.is_empty() {
        return format!("{name}. Made with care");
    }
    let index = name.chars().map(|c| c as usize).sum::<usize>() % templates.len();
    templates[index].replace("{name}", name)
}
