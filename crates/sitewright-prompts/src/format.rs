use sitewright_core::SnapshotEntry;

/// Append the output contract the response parser relies on.
pub fn append_instructions(prompt: &mut String, files: &[SnapshotEntry]) {
    prompt.push_str("INSTRUCTIONS:\n");
    prompt.push_str(
        "1. Return the FULL content of the modified files.\n\
         2. If a file is not modified, do not return it.\n\
         3. Use the following format strictly:\n\n",
    );
    for entry in files {
        append_block_example(prompt, &entry.name, entry.language_tag());
    }
    prompt.push_str("Do not add any other conversational text. Just the file blocks.\n");
}

fn append_block_example(prompt: &mut String, name: &str, tag: &str) {
    prompt.push_str(&format!("FILE: {name}\n"));
    prompt.push_str(&format!("```{tag}\n"));
    prompt.push_str(&format!("... full content of {name} ...\n"));
    prompt.push_str("```\n\n");
}
