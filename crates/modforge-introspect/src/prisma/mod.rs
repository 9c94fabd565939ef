use modforge_core::{Error, ModelDescriptor, Result, validate_model};

use crate::adapter::Adapter;
use crate::reader::SchemaText;

pub mod lexer;
mod mapper;
pub mod parser;

pub use parser::{Attribute, Block, BlockBody, BlockKeyword, FieldDecl, SchemaDocument, TypeModifier};

/// Tokenizer or parser failure, positioned in the concatenated schema text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    fn into_error(self, schema: &SchemaText) -> Error {
        Error::SchemaSyntax {
            location: schema.locate(self.line, self.column),
            message: self.message,
        }
    }
}

/// Adapter for the Prisma schema language.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrismaAdapter;

impl Adapter for PrismaAdapter {
    fn engine(&self) -> &'static str {
        "prisma"
    }

    fn introspect_model(&self, schema: &SchemaText, model: &str) -> Result<ModelDescriptor> {
        introspect_prisma_model(schema, model)
    }
}

/// Parse the whole schema into blocks.
pub fn parse_prisma_schema(schema: &SchemaText) -> Result<SchemaDocument> {
    let tokens = lexer::tokenize(schema.as_str()).map_err(|err| err.into_error(schema))?;
    parser::parse(&tokens).map_err(|err| err.into_error(schema))
}

/// Describe the model whose name matches `name`, ignoring case.
pub fn introspect_prisma_model(schema: &SchemaText, name: &str) -> Result<ModelDescriptor> {
    let document = parse_prisma_schema(schema)?;
    let block = mapper::find_model(&document, name)?;
    let model = mapper::map_model(&document, block);
    validate_model(&model)?;
    Ok(model)
}
