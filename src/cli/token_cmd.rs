//! Token replacement command

use anyhow::Result;

use super::input::read_document;
use super::output::Output;
use crate::plugin::token_type;
use crate::render::{Entity, TokenData, TokenOptions, TokenReplacer, TokenService};
use crate::storage::Project;

pub struct TokenArgs<'a> {
    pub template: &'a str,
    pub entity: Option<&'a str>,
    pub keep_unmatched: bool,
    pub html: bool,
}

/// Replaces placeholders in a template using an entity's fields
pub fn run(output: &Output, args: TokenArgs<'_>) -> Result<()> {
    let project = Project::open_current()?;

    let mut data = TokenData::new();
    if let Some(entity) = args.entity {
        let entity: Entity = read_document(entity)?;
        data.insert(token_type(&entity).to_string(), entity);
    }

    let options = TokenOptions {
        clear: project.config().project.token.clear && !args.keep_unmatched,
    };
    tracing::debug!(clear = options.clear, types = data.len(), "Replacing tokens");

    let replacer = TokenReplacer::new();
    let placeholders = replacer.scan(args.template);

    let (text, cache_tags) = if args.html {
        let replaced = replacer.replace(args.template, &data, options)?;
        (replaced.text, replaced.cache_tags)
    } else {
        (replacer.replace_plain(args.template, &data, options)?, Vec::new())
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "text": text,
            "placeholders": placeholders,
            "cache_tags": cache_tags,
        }));
    } else {
        println!("{}", text);
    }

    Ok(())
}
