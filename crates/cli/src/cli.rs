use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docqa_rag::AnswerLanguage;

/// Ask questions about your documents.
///
/// Uploads are loaded, chunked and embedded into an in-memory index; each
/// question retrieves the closest chunks and hands them to the configured
/// language model.
#[derive(Parser, Debug)]
#[command(name = "docqa", version, about = "Question answering over PDF, DOCX and TXT files")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single question and exit
    Ask(AskArgs),
    /// Index the files once, then answer one question per input line
    Chat(ChatArgs),
    /// Print the resolved configuration with secrets redacted
    Config,
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Document to index (.pdf, .docx, .txt); repeat for several
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Language the answer should be written in: english or arabic
    #[arg(short, long, env = "DOCQA_LANGUAGE", default_value = "english")]
    pub language: AnswerLanguage,

    /// Number of chunks retrieved per question (overrides RETRIEVAL_TOP_K)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the answer and retrieved chunks as JSON
    #[arg(long)]
    pub json: bool,

    /// The question to answer
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    /// Unquoted questions arrive as several words.
    pub fn question(&self) -> String {
        self.question.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
