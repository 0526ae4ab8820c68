//! Instruction prompt for caption normalization.
//!
//! The rule set below is the contract with the generator: the validator and the fallback
//! sentences assume the output follows it. Keep the wording stable; change it only
//! together with [`super::vocabulary`].

use std::fmt::Write;

use super::types::NormalizationRequest;
use super::vocabulary::{
    ACCESSORY_TYPES, CoatColor, EXTENDED_COLORS, Temperament, accessory_phrase,
    appearance_summary, color_summary, detect_accessories, normalize_coat_colors,
    normalize_temperament,
};

/// Renders the normalization prompt. Pure: equal inputs give byte-identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_for(&self, request: &NormalizationRequest) -> String {
        self.build(&request.breed, &request.colors, &request.features)
    }

    pub fn build(&self, breed: &str, colors: &str, features: &str) -> String {
        let mut prompt = String::with_capacity(6 * 1024);
        prompt.push_str(&instructions());

        prompt.push_str("\n---\n**USER INPUT:**\n\n");
        let _ = write!(prompt, "**Breed:**\n{}\n\n", breed.trim());
        let _ = write!(prompt, "**Colors:**\n{}\n\n", colors.trim());
        let _ = write!(prompt, "**Free Text Description:**\n{}\n", features.trim());

        if let Some(hints) = normalized_hints(colors, features) {
            prompt.push_str("\n---\n**NORMALIZED HINTS (derived from the input above):**\n");
            prompt.push_str(&hints);
        }

        prompt
    }
}

fn instructions() -> String {
    let primary = CoatColor::ALL
        .iter()
        .map(CoatColor::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let extended = EXTENDED_COLORS
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let accessories = ACCESSORY_TYPES.join(", ");
    let temperaments = Temperament::ALL
        .iter()
        .map(Temperament::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let summary_example = appearance_summary("Shiba Inu", &[CoatColor::Tan, CoatColor::White]);
    let colors_example = color_summary("Shiba Inu", &[CoatColor::Tan, CoatColor::White]);
    let uncolored_example = accessory_phrase("bow", None);
    let colored_example = accessory_phrase("collar", Some("red"));

    format!(
        r#"You are an expert data normalizer for a dog image-matching service.
Your sole purpose is to generate standardized, short English sentences for CLIP text encoding based on user input.
You must follow all rules with extreme precision to ensure the output is deterministic, detailed, and structurally perfect.

**Task:**
Produce exactly 3 short English sentences describing the same dog.

**Output Format:**
Return ONLY a JSON object with keys "sentence1", "sentence2", and "sentence3".
Example: {{"sentence1": "First sentence.", "sentence2": "Second sentence.", "sentence3": "Third sentence."}}

---
**GLOBAL RULES:**
1. **Sentence Count:** Exactly 3 sentences.
2. **Word Count:** Each sentence must be 25 words or less.
3. **Content:** Use plain ASCII characters only. No emojis.
4. **Certainty:** Do not use words of uncertainty (e.g., maybe, probably, seems like). State confirmed facts only.
5. **Negation:** Use "no" or "without" to express absence (e.g., "without collar").
6. **Determinism:** Always generate the same output for identical input. No randomness.

---
**SENTENCE STRUCTURE RULES:**

**Sentence 1 (Main Description & High-Level Summary):**
- This sentence serves as a general summary. It MUST include breed, colors, accessories (with color), and temperament if available.
- It should ALSO include general physical descriptions (e.g., "long body", "fluffy tail") if provided.
- **CRITICAL:** This sentence MUST NOT list the specific, detailed items that will be described in Sentence 2 (i.e., do not repeat "Special marks" or "Accessories/appearance" items).

**Sentence 2 (Distinctive Features):**
- This sentence has conditional logic based on the input.
- **IF** the text contains distinctive visual identifiers, the sentence MUST start with "Special marks: " followed by 2-4 concise noun phrases.
  - **Definition:** "Special marks" includes BOTH color patterns (e.g., "white socks", "heart-shaped patch") AND unique physical traits (e.g., "unusually large right ear", "folded ear tip").
  - Example: "Special marks: white blaze on face, folded left ear tip."
- **ELSE IF** no markings are provided but accessories or other appearance notes are, the sentence MUST start with "Accessories/appearance: " followed by a list of items.
  - This includes listed accessories AND general appearance notes like grooming (e.g., "round haircut").
  - Example: "Accessories/appearance: red harness, round haircut."
- **ELSE** (if no markings AND no accessories/appearance notes), use this fallback format: "Appearance summary: [Breed] with [color] coat."
  - Example: "{summary_example}"

**Sentence 3 (Simple Summary):**
- Provide a very short, structured summary.
- Format: "[Breed]; colors: [color1], [color2]."
- Example: "{colors_example}"

---
**CONTENT CONSTRAINT RULES:**

**Color Rules:**
- You MUST only use colors from this whitelist: {{{primary}}}.
- Normalize user-provided colors to the closest color in the whitelist (e.g., "light brown" -> "tan", "chocolate" -> "brown").
- Use a maximum of 3 colors.
- Additionally, if user input includes accessory or non-fur colors, you may also use extended colors from this list: {{{extended}}}. These are mainly allowed for accessories (e.g., "blue collar", "pink bow").
- Always prefer coat colors from the primary list for fur and body description, and use extended colors only for accessories or explicitly mentioned special marks.

**Accessory & Detail Rules:**
- **CRITICAL:** When an accessory is mentioned, you MUST preserve its details. If any color information exists for an accessory in the user input or color list, you MUST include it (e.g., render "green collar", not just "collar").
- If the user did not specify an accessory color, you MUST explicitly write "uncolored [accessory]" instead of omitting the color.
  Example:
    - Input: "wearing a bow" -> Output: "wearing an {uncolored_example}."
    - Input: "wearing a red collar" -> Output: "wearing a {colored_example}."
- List specific items (e.g., "sweater", "shoes"). Do not over-generalize to "clothes" if specifics are given.
- Recognized accessory types include: {{{accessories}}}.

**Temperament Rules:**
- If a temperament is mentioned, you may use it. Consider normalizing to this set if possible: {{{temperaments}}}. Omit if not provided.
"#
    )
}

fn normalized_hints(colors: &str, features: &str) -> Option<String> {
    let coat = normalize_coat_colors(colors);
    let accessories = detect_accessories(features);
    let temperament = normalize_temperament(features);

    if coat.is_empty() && accessories.is_empty() && temperament.is_none() {
        return None;
    }

    let mut hints = String::new();
    if !coat.is_empty() {
        let listed: Vec<&str> = coat.iter().map(CoatColor::as_str).collect();
        let _ = writeln!(hints, "- Coat colors: {}", listed.join(", "));
    }
    if !accessories.is_empty() {
        let _ = writeln!(hints, "- Accessories: {}", accessories.join(", "));
    }
    if let Some(temperament) = temperament {
        let _ = writeln!(hints, "- Temperament: {}", temperament.as_str());
    }
    Some(hints)
}
