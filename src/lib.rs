pub mod canonicalize;
pub mod config;
pub mod markdown;
pub mod resolver;
pub mod rewrite;
pub mod runtime;
pub mod sources;
pub mod utils;

pub use canonicalize::normalize_url;
pub use config::{DeploymentMode, ResolverConfig, ResolverConfigBuilder, SiteSearchRule};
pub use markdown::render;
pub use resolver::{
    LinkResolver, ResolveError, ResolveResult, WrapperStrategy, resolve_wrapper_url,
    verify_or_improve,
};
pub use rewrite::{RewriteStats, rewrite_links_to_direct, rewrite_links_with_stats};
pub use runtime::{CancelSignal, with_timeout};
pub use sources::{
    GroundedSource, GroundingMetadata, append_sources_section, extract_grounded_sources,
    format_sources_markdown, select_sources,
};
pub use utils::is_http_url;

/// Rewrite links in generated text, append its grounded sources and render the result.
///
/// This is the whole pipeline a request handler needs: wrapper URLs are
/// resolved, destinations verified, a "Sources" section is added from
/// `metadata` (when present) and the Markdown is rendered to sanitized HTML.
pub async fn render_grounded_answer(
    text: &str,
    metadata: Option<&GroundingMetadata>,
    resolver: &LinkResolver,
) -> String {
    let rewritten = rewrite_links_to_direct(text, resolver).await;
    let with_sources = match metadata {
        Some(metadata) => {
            let sources = extract_grounded_sources(metadata, resolver).await;
            append_sources_section(&rewritten, &sources)
        }
        None => rewritten,
    };
    render(&with_sources)
}
