use docqa_prompt::{GroundingPrompt, PromptError, PromptTemplate};

#[test]
fn grounding_prompt_places_chunks_before_the_question() {
    let prompt = GroundingPrompt::new()
        .build(
            "  When was the company founded? ",
            ["The company was founded in 1999.", "  Offices in Berlin.\n"],
        )
        .expect("prompt");

    assert!(prompt.starts_with("Use the following pieces of context"));
    assert!(prompt.contains("The company was founded in 1999.\n\nOffices in Berlin.\n\nQuestion:"));
    assert!(prompt.ends_with("Question: When was the company founded?\nHelpful Answer:"));
}

#[test]
fn grounding_prompt_with_no_chunks_still_asks_the_question() {
    let prompt = GroundingPrompt::new()
        .build("Anything?", std::iter::empty())
        .expect("prompt");

    assert!(prompt.contains("Question: Anything?"));
}

#[test]
fn custom_template_must_reference_context_and_question() {
    let error = GroundingPrompt::with_template(PromptTemplate::new("{{question}} only")).unwrap_err();
    assert_eq!(error, PromptError::MissingVariable("context".to_string()));

    let prompt = GroundingPrompt::with_template(PromptTemplate::new("Q={{question}} C={{context}}"))
        .expect("template")
        .build("why", ["because"])
        .expect("prompt");
    assert_eq!(prompt, "Q=why C=because");
}
