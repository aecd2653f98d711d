use async_trait::async_trait;
use docqa_llm::{DecoderOnlyLlm, Llm, LlmError, Seq2SeqLlm};

struct DummyLlm;

#[async_trait]
impl Llm for DummyLlm {
    async fn generate(&self, _prompt: &str, _max_tokens: usize) -> Result<String, LlmError> {
        Ok("ok".to_string())
    }

    fn name(&self) -> &str {
        "dummy"
    }
}

fn assert_llm<T: Llm>() {}

#[test]
fn backends_implement_llm() {
    assert_llm::<DummyLlm>();
    assert_llm::<Seq2SeqLlm>();
    assert_llm::<DecoderOnlyLlm>();
}

#[tokio::test]
async fn llm_is_usable_as_trait_object() {
    let llm: Box<dyn Llm> = Box::new(DummyLlm);
    assert_eq!(llm.generate("prompt", 4).await.unwrap(), "ok");
}
