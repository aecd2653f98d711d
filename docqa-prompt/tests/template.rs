use std::collections::HashMap;

use docqa_core::{DocqaError, ErrorKind};
use docqa_prompt::{PromptError, PromptTemplate};

#[test]
fn renders_template_with_vars() {
    let tmpl = PromptTemplate::new("Hello {{name}}");
    let vars = HashMap::from([("name", "Docqa".to_string())]);
    let rendered = tmpl.render(&vars).expect("render");
    assert_eq!(rendered, "Hello Docqa");
}

#[test]
fn does_not_confuse_overlapping_keys() {
    let tmpl = PromptTemplate::new("{{name}} {{ fullname }}");
    let vars = HashMap::from([("name", "X".to_string()), ("fullname", "Y".to_string())]);
    let rendered = tmpl.render(&vars).expect("render");
    assert_eq!(rendered, "X Y");
}

#[test]
fn substituted_values_are_not_expanded_again() {
    let tmpl = PromptTemplate::new("{{a}}|{{b}}");
    let vars = HashMap::from([("a", "{{b}}".to_string()), ("b", "two".to_string())]);
    assert_eq!(tmpl.render(&vars).expect("render"), "{{b}}|two");
}

#[test]
fn missing_variable_is_an_error() {
    let tmpl = PromptTemplate::new("{{context}} {{question}}");
    let vars = HashMap::from([("context", "c".to_string())]);

    let error = tmpl.render(&vars).unwrap_err();
    assert_eq!(error, PromptError::MissingVariable("question".to_string()));
    assert_eq!(DocqaError::from(error).kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn lists_variables() {
    let tmpl = PromptTemplate::new("{{b}} {{a}} {{b}}");
    let names: Vec<String> = tmpl.variables().expect("variables").into_iter().collect();
    assert_eq!(names, vec!["a", "b"]);
}
