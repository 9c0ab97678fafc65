//! Schema inference from legacy property-declaration sources.
//!
//! The pipeline runs in four steps:
//!
//! 1. a lexical pass pairs braces while treating strings and comments as
//!    opaque ([`lexer`](self) is internal)
//! 2. [`DeclarationExtractor`] collects `property` declarations per block
//! 3. [`infer`] turns each declaration into a [`SchemaNode`]
//! 4. [`SchemaAssembler`] repeats this for every module file and attaches
//!    the [`CrossFieldRule`]s
//!
//! The result can be rendered as a JSON Schema document or as TypeScript
//! definitions, and guides [`ConfigValidator`](crate::config::ConfigValidator).

mod assembler;
mod extractor;
mod inference;
mod lexer;
pub mod literal;
mod node;
mod rules;
mod typescript;

#[cfg(test)]
mod proptests;

pub use assembler::{
    AssembledSchema, SchemaAssembler, SkipReason, SkippedModule, MODULE_FILES, SCHEMA_DIALECT,
    SCHEMA_TITLE,
};
pub use extractor::{
    Declaration, DeclarationEntry, DeclarationExtractor, DeclarationMap, DuplicateDeclaration,
    Extraction, ObjectDeclaration, SkippedDeclaration, MAX_NESTING_DEPTH, OBJECT_KEYWORD,
};
pub use inference::{
    declarations_to_values, infer, infer_declaration, infer_properties, map_type, COLOR_PATTERN,
    MAX_DURATION_MS,
};
pub use node::{Properties, SchemaNode, SchemaType};
pub use rules::{render_all_of, render_dependencies, CrossFieldRule};
pub use typescript::render_typescript;
