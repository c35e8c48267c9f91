//! Prompts for the verdict analyzer.
//!
//! The system prompt is static; the user prompt carries the headline and a
//! numbered evidence block. Item numbers in the prompt are the indices the
//! model uses in `evidence_assessments`.

use factline_core::EvidenceSet;

/// System prompt establishing the fact-checker role and output contract.
pub const SYSTEM_PROMPT: &str = r#"
You are a professional fact-checker. You assess a single news headline
against the numbered evidence you are given.

## Constraints
1. Judge ONLY against the evidence provided and well-established facts
2. Absence of coverage for a dramatic event is itself evidence against it
3. Do not speculate beyond the evidence; lower your confidence instead
4. Focus on factual accuracy, not opinions

## Output Format (JSON only, no prose)
{
  "truthfulness": 0-100 integer,
  "confidence": 0-100 number (a percentage, not a 0-1 fraction),
  "analysis": "2-3 sentence explanation of your assessment",
  "concerns": ["specific problems with the headline"],
  "recommendations": "what readers should know or do",
  "evidence_assessments": [
    { "index": 1, "stance": "SUPPORTS" | "CONTRADICTS" | "UNCLEAR", "relevance": "HIGH" | "MEDIUM" | "LOW" }
  ]
}

## Truthfulness Scale
- 85-100: Factually accurate and well-supported
- 40-75: Mixed accuracy, some elements false or unsupported
- 20-50: Technically true elements presented deceptively
- 0-15: False, fabricated, or contradicted by the evidence

## Deceptive Framing
If the headline is misleading, sensationalized, out of context, or
cherry-picks facts, say so explicitly in "concerns" using those words.

## Confidence
Confidence reflects how certain you are, independent of truthfulness.
Thin or irrelevant evidence means low confidence.
"#;

/// Build the user prompt for one headline.
pub fn user_prompt(headline: &str, evidence: &EvidenceSet) -> String {
    let mut prompt = format!("HEADLINE TO FACT-CHECK: \"{}\"\n\n", headline);
    prompt.push_str("EVIDENCE FOR VERIFICATION:\n");
    prompt.push_str(&"=".repeat(50));
    prompt.push('\n');

    for (i, item) in evidence.iter().enumerate() {
        prompt.push_str(&format!("\nEVIDENCE {}:\n", i + 1));
        prompt.push_str(&format!("Source: {}\n", item.source()));
        prompt.push_str(&format!("Stance: {}\n", item.stance().label()));
        prompt.push_str(&format!("Relevance: {}\n", item.relevance().label()));
        prompt.push_str(&format!("Summary: {}\n", item.summary()));
        prompt.push_str(&format!("URL: {}\n", item.url().unwrap_or("N/A")));
        prompt.push_str(&"-".repeat(30));
        prompt.push('\n');
    }

    if evidence.is_fallback() {
        prompt.push_str(
            "\nNOTE: No search provider returned results for this headline. \
             Rely on well-established facts and treat the lack of coverage accordingly.\n",
        );
    }

    prompt.push_str("\nRespond with the JSON object only.");
    prompt
}
