use crate::search::{PaperRecord, SearchOutcome};

pub const USER_PROMPT: &str = "user@archives:~$";
pub const SYSTEM_PROMPT: &str = "system@archives:~$";

#[derive(Debug, Clone, PartialEq)]
pub enum TerminalLine {
    Comment(String),
    Command { prompt: &'static str, command: String },
    Text(String),
    /// Index into `Terminal::results`.
    Result(usize),
}

/// What a line typed into the search prompt should do.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction {
    Empty,
    OpenUpload,
    Search(String),
}

impl QueryAction {
    pub fn parse(input: &str) -> Self {
        let query = input.trim();
        if query.is_empty() {
            QueryAction::Empty
        } else if query.eq_ignore_ascii_case("upload") {
            QueryAction::OpenUpload
        } else {
            QueryAction::Search(query.to_string())
        }
    }
}

#[derive(Debug, Default)]
pub struct Terminal {
    pub lines: Vec<TerminalLine>,
    /// Every paper listed so far; result lines point into this.
    pub results: Vec<PaperRecord>,
    /// Papers from the most recent search, for the uploader details view.
    pub latest: Vec<usize>,
}

impl Terminal {
    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(TerminalLine::Comment(text.into()));
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.lines.push(TerminalLine::Text(text.into()));
    }

    pub fn command(&mut self, prompt: &'static str, command: impl Into<String>) {
        self.lines.push(TerminalLine::Command {
            prompt,
            command: command.into(),
        });
    }

    pub fn welcome(&mut self) {
        self.comment("// Welcome to the Terminal Archives.");
        self.text("Connecting to archives...");
    }

    pub fn connected(&mut self, count: usize, demo: bool) {
        if demo {
            self.comment(format!("// Connected. {} demo papers found in the database.", count));
            self.comment("// Demo Mode: This is a static preview. Backend features are not available.");
        } else {
            self.comment(format!("// Connected. {} papers found in the database.", count));
        }
        self.ready();
    }

    pub fn connection_failed(&mut self, demo_count: usize) {
        self.comment("// Connection to archives failed. Running in demo mode.");
        self.comment(format!("// Demo Mode: {} demo papers available.", demo_count));
        self.ready();
    }

    fn ready(&mut self) {
        self.command(SYSTEM_PROMPT, "ready");
        self.text("System ready. Press Ctrl + K to search the database.");
    }

    pub fn empty_query(&mut self) {
        self.comment("// Please enter a search term.");
    }

    pub fn opening_upload(&mut self, demo: bool) {
        self.comment("// Opening the upload form...");
        if demo {
            self.comment("// Note: Backend features are not available in demo mode.");
        }
    }

    pub fn begin_search(&mut self, query: &str) {
        self.command(USER_PROMPT, format!("search --query=\"{}\"", query));
        self.text("Searching database...");
    }

    pub fn search_failed(&mut self) {
        self.comment("// Error connecting to the search API.");
    }

    pub fn show_outcome(&mut self, outcome: SearchOutcome) {
        self.latest.clear();

        if outcome.papers.is_empty() {
            self.text("No results found for your query.");
            self.comment("// Press Ctrl + K to search again.");
            return;
        }

        self.text(format!("Found {} result(s):", outcome.papers.len()));
        for paper in outcome.papers {
            let index = self.results.len();
            self.results.push(paper);
            self.latest.push(index);
            self.lines.push(TerminalLine::Result(index));
        }
        self.comment("// Press F to view uploader details, Ctrl + K to search again.");
        if outcome.demo {
            self.comment("// Note: This is a demo version. Upload and login need a running archive server.");
        }
    }

    pub fn latest_results(&self) -> impl Iterator<Item = &PaperRecord> {
        self.latest.iter().filter_map(|i| self.results.get(*i))
    }
}
