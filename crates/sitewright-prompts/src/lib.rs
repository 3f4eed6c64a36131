pub mod context;
pub mod format;

pub use context::PromptContext;

/// Assemble the full prompt: preamble, request, current files, output contract.
pub fn assemble_prompt(ctx: &PromptContext) -> String {
    let mut prompt = String::new();
    ctx.append_preamble(&mut prompt);
    ctx.append_request(&mut prompt);
    ctx.append_files(&mut prompt);
    format::append_instructions(&mut prompt, ctx.snapshot.entries());
    prompt
}
