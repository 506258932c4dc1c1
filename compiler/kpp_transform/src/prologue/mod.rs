//! Injects the platform prologue `#include` ahead of the first node.

use kpp_ir::TokenKind;
use tracing::debug;

use crate::{Processor, ProcessorConfig, Transform, TransformError, TransformRegistry};

pub const NAME: &str = "prologue";

pub fn register(registry: &mut TransformRegistry) {
    registry.register(NAME, create);
}

fn create(config: &ProcessorConfig) -> Box<dyn Transform> {
    Box::new(PrologueTransform::new(config))
}

pub struct PrologueTransform {
    header: String,
}

impl PrologueTransform {
    pub fn new(config: &ProcessorConfig) -> Self {
        PrologueTransform {
            header: config.prologue_header().to_string(),
        }
    }
}

impl Transform for PrologueTransform {
    fn name(&self) -> &'static str {
        NAME
    }

    #[tracing::instrument(level = "debug", skip_all, fields(header = %self.header))]
    fn apply(&mut self, processor: &mut Processor) -> Result<(), TransformError> {
        let tree = processor.tree();
        let Some(first) = tree.first_child(tree.root()) else {
            debug!("no nodes; nothing to include before");
            return Ok(());
        };
        let line = tree
            .tokens(first)
            .map_or(1, |range| processor.tokens().line(range.first));
        let run = processor
            .run(line)
            .punct(TokenKind::Hash)
            .symbol("include")
            .space()
            .string(&self.header)
            .eol()
            .finish()?;
        if let Some(run) = run {
            processor.insert_user_node_before(first, run)?;
        }
        Ok(())
    }
}
