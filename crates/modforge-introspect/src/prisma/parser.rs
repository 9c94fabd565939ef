use super::SyntaxError;
use super::lexer::{Token, TokenKind};

/// Parsed schema: every top-level block in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    pub blocks: Vec<Block>,
}

impl SchemaDocument {
    pub fn blocks_of(&self, keyword: BlockKeyword) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |block| block.keyword == keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKeyword {
    Model,
    View,
    /// Composite type.
    Type,
    Enum,
    Datasource,
    Generator,
}

impl BlockKeyword {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "model" => Some(Self::Model),
            "view" => Some(Self::View),
            "type" => Some(Self::Type),
            "enum" => Some(Self::Enum),
            "datasource" => Some(Self::Datasource),
            "generator" => Some(Self::Generator),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub keyword: BlockKeyword,
    pub name: String,
    pub line: usize,
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Fields(Vec<FieldDecl>),
    Values(Vec<String>),
    /// Key/value configuration, not inspected.
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub modifier: TypeModifier,
    pub attributes: Vec<Attribute>,
    pub line: usize,
}

impl FieldDecl {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute.name == name)
    }
}

/// Modifier written after a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeModifier {
    #[default]
    None,
    /// `Type?`
    Optional,
    /// `Type[]`
    List,
}

/// A field attribute such as `@default(now())`; dotted names keep their
/// namespace (`db.ObjectId`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub has_arguments: bool,
}

/// Recursive-descent parse of a token stream.
pub fn parse(tokens: &[Token]) -> Result<SchemaDocument, SyntaxError> {
    Parser { tokens, pos: 0 }.document()
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.pos.min(tokens.len().saturating_sub(1))]
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, token: &Token, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(token.line, token.column, message)
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'t Token, SyntaxError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.error(token, format!("expected {what}")))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, SyntaxError> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Ident(value) => Ok(value.clone()),
            _ => Err(self.error(token, format!("expected {what}"))),
        }
    }

    fn document(mut self) -> Result<SchemaDocument, SyntaxError> {
        let mut blocks = Vec::new();
        loop {
            self.skip_newlines();
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Ident(keyword) => match BlockKeyword::from_ident(keyword) {
                    Some(keyword) => {
                        self.advance();
                        blocks.push(self.block(keyword, token.line)?);
                    }
                    None => return Err(self.error(token, format!("unknown block `{keyword}`"))),
                },
                _ => return Err(self.error(token, "expected block declaration")),
            }
        }
        Ok(SchemaDocument { blocks })
    }

    fn block(&mut self, keyword: BlockKeyword, line: usize) -> Result<Block, SyntaxError> {
        let name = self.ident("block name")?;
        self.expect(TokenKind::LBrace, "`{`")?;
        let body = match keyword {
            BlockKeyword::Model | BlockKeyword::View | BlockKeyword::Type => {
                BlockBody::Fields(self.fields()?)
            }
            BlockKeyword::Enum => BlockBody::Values(self.enum_values()?),
            BlockKeyword::Datasource | BlockKeyword::Generator => {
                self.skip_until_close(TokenKind::LBrace, TokenKind::RBrace)?;
                BlockBody::Config
            }
        };
        Ok(Block {
            keyword,
            name,
            line,
            body,
        })
    }

    fn fields(&mut self) -> Result<Vec<FieldDecl>, SyntaxError> {
        let mut fields = Vec::new();
        loop {
            self.skip_newlines();
            let token = self.peek();
            match &token.kind {
                TokenKind::RBrace => {
                    self.advance();
                    return Ok(fields);
                }
                TokenKind::AtAt => {
                    self.attribute()?;
                    self.end_of_member()?;
                }
                TokenKind::Ident(_) => fields.push(self.field()?),
                TokenKind::Eof => return Err(self.error(token, "unclosed block, expected `}`")),
                _ => return Err(self.error(token, "expected field declaration")),
            }
        }
    }

    fn field(&mut self) -> Result<FieldDecl, SyntaxError> {
        let line = self.peek().line;
        let name = self.ident("field name")?;
        let type_name = self.ident("field type")?;
        if type_name == "Unsupported" && self.peek().kind == TokenKind::LParen {
            self.advance();
            self.skip_until_close(TokenKind::LParen, TokenKind::RParen)?;
        }

        let modifier = match self.peek().kind {
            TokenKind::LBracket => {
                self.advance();
                self.expect(TokenKind::RBracket, "`]`")?;
                TypeModifier::List
            }
            TokenKind::Question => {
                self.advance();
                TypeModifier::Optional
            }
            _ => TypeModifier::None,
        };

        let mut attributes = Vec::new();
        while self.peek().kind == TokenKind::At {
            attributes.push(self.attribute()?);
        }
        self.end_of_member()?;

        Ok(FieldDecl {
            name,
            type_name,
            modifier,
            attributes,
            line,
        })
    }

    fn enum_values(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut values = Vec::new();
        loop {
            self.skip_newlines();
            let token = self.peek();
            match &token.kind {
                TokenKind::RBrace => {
                    self.advance();
                    return Ok(values);
                }
                TokenKind::AtAt => {
                    self.attribute()?;
                    self.end_of_member()?;
                }
                TokenKind::Ident(value) => {
                    self.advance();
                    values.push(value.clone());
                    while self.peek().kind == TokenKind::At {
                        self.attribute()?;
                    }
                    self.end_of_member()?;
                }
                TokenKind::Eof => return Err(self.error(token, "unclosed enum, expected `}`")),
                _ => return Err(self.error(token, "expected enum value")),
            }
        }
    }

    /// `@name`, `@@name`, `@ns.name`, each with optional `( ... )` arguments.
    fn attribute(&mut self) -> Result<Attribute, SyntaxError> {
        self.advance();
        let mut name = self.ident("attribute name")?;
        while self.peek().kind == TokenKind::Dot {
            self.advance();
            name.push('.');
            name.push_str(&self.ident("attribute name")?);
        }

        let has_arguments = self.peek().kind == TokenKind::LParen;
        if has_arguments {
            self.advance();
            self.skip_until_close(TokenKind::LParen, TokenKind::RParen)?;
        }
        Ok(Attribute {
            name,
            has_arguments,
        })
    }

    /// A member ends at a newline or right before the closing brace.
    fn end_of_member(&mut self) -> Result<(), SyntaxError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::RBrace => Ok(()),
            _ => Err(self.error(token, "unexpected token after declaration")),
        }
    }

    /// Consume tokens up to and including the `close` matching an already
    /// consumed `open`.
    fn skip_until_close(&mut self, open: TokenKind, close: TokenKind) -> Result<(), SyntaxError> {
        let mut depth = 1usize;
        loop {
            let token = self.advance();
            if token.kind == TokenKind::Eof {
                return Err(self.error(token, "unbalanced delimiters"));
            }
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
    }
}
