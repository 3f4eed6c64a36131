use sitewright_core::FileSnapshot;

/// Everything needed to assemble the update prompt.
#[derive(Debug, Clone)]
pub struct PromptContext {
    /// The issue body, embedded verbatim.
    pub request: String,
    pub snapshot: FileSnapshot,
}

impl PromptContext {
    pub fn append_preamble(&self, prompt: &mut String) {
        prompt.push_str(
            "You are an expert web developer agent.\n\
             Your task is to modify the following website code based on the user's request.\n\n",
        );
    }

    pub fn append_request(&self, prompt: &mut String) {
        prompt.push_str("USER REQUEST:\n");
        prompt.push_str(&self.request);
        prompt.push_str("\n\n");
    }

    /// One `--- name ---` section per file, with its content or the sentinel.
    pub fn append_files(&self, prompt: &mut String) {
        prompt.push_str("CURRENT FILE CONTENT:\n\n");
        for entry in self.snapshot.entries() {
            prompt.push_str(&format!("--- {} ---\n", entry.name));
            prompt.push_str(entry.content_or_sentinel());
            prompt.push_str("\n\n");
        }
    }
}
