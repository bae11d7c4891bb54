pub mod align;
pub mod comments;
pub mod lexer;
pub mod methods;
pub mod model;
pub mod nlp;
pub mod scanner;
pub mod source;
pub mod util;

pub use model::{CommentBlock, DatasetRow, MethodRecord, Token, TokenKind};
pub use scanner::{
    build_corpus, build_corpus_with, process_source, write_corpus, Corpus, CorpusSummary,
    FileOutcome, FileReport, FileStatus,
};
