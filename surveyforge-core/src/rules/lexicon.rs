//! Lexical cue families shared by the classifier, option extractor and
//! help-text resolver.
//!
//! Every family spans English, Albanian and Serbian (Latin and Cyrillic).
//! Albanian patterns accept both `ë` and a plain `e`, since extracted text
//! frequently loses the diaeresis.

use regex::Regex;
use std::sync::LazyLock;

static YES_NO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:yes|no|po|jo|da|ne|да|не)[.!]?$").unwrap());

static FREE_RESPONSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        // English
        r"please\s+(?:write|describe|explain|provide|enter|give)\s+your\s+(?:own\s+)?(?:answers?|responses?|comments?|opinions?)",
        r"|write\s+your\s+(?:answers?|responses?|comments?)\s+(?:here|below)",
        r"|(?:your\s+)?(?:answer|response)\s+here\b",
        r"|leave\s+(?:a|your)\s+comments?\s+(?:on|about)\s+your\s+(?:choice|answer|selection)",
        r"|comment\s+on\s+your\s+(?:choice|answer|selection)",
        // Albanian
        r"|shkruani\s+p[eë]rgjigjen",
        r"|p[eë]rshkruani\s+p[eë]rgjigjen",
        r"|shkruaj(?:ni)?\s+k[eë]tu",
        r"|lini\s+(?:nj[eë]\s+)?koment",
        r"|komentoni\s+zgjedhjen",
        // Serbian, Latin
        r"|(?:napi[sš]ite|opi[sš]ite|upi[sš]ite)\s+(?:va[sš]\s+|svoj\s+)?odgovor",
        r"|ostavite\s+komentar",
        r"|komentari[sš]ite\s+(?:va[sš]\s+|svoj\s+)?izbor",
        // Serbian, Cyrillic
        r"|(?:напишите|опишите|упишите)\s+(?:ваш\s+|свој\s+)?одговор",
        r"|оставите\s+коментар",
        r")"
    ))
    .unwrap()
});

static SELECT_ALL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        r"all\s+that\s+apply|all\s+which\s+apply",
        r"|more\s+than\s+one\s+(?:answer|option)|multiple\s+answers",
        r"|zgjidhni\s+t[eë]\s+gjitha|t[eë]\s+gjitha\s+q[eë]\s+vlejn[eë]",
        r"|m[eë]\s+shum[eë]\s+se\s+nj[eë]|disa\s+p[eë]rgjigje",
        r"|(?:izaberite|odaberite|ozna[cč]ite|zaokru[zž]ite)\s+sve",
        r"|vi[sš]e\s+odgovora",
        r"|(?:изаберите|означите|заокружите)\s+све|више\s+одговора",
        r")"
    ))
    .unwrap()
});

static SELECT_ONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        r"\b(?:select|choose|check|mark|tick|circle)\s+(?:only\s+)?one\b",
        r"|only\s+one\s+(?:answer|option)|one\s+answer\s+only",
        r"|zgjidhni\s+(?:vet[eë]m\s+)?nj[eë]\b|vet[eë]m\s+nj[eë]\s+(?:p[eë]rgjigje|opsion)",
        r"|(?:izaberite|odaberite|ozna[cč]ite|zaokru[zž]ite)\s+(?:samo\s+)?jedan",
        r"|samo\s+jedan\s+odgovor",
        r"|(?:изаберите|означите|заокружите)\s+(?:само\s+)?један|само\s+један\s+одговор",
        r")"
    ))
    .unwrap()
});

static RATING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"satisf\w*|dissatisf\w*|unsatisf\w*|agree\w*|disagree\w*|rate|rating|how\s+likely",
        r"|k[eë]naq\w*|pak[eë]naq\w*|pajtohe\w*|dakord|vler[eë]so\w*",
        r"|zadovolj\w*|nezadovolj\w*|sla[zž]e\w*|ocen\w*|ocijen\w*",
        r"|задовољ\w*|незадовољ\w*|слаже\w*|оцен\w*",
        r")\b"
    ))
    .unwrap()
});

static FREE_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:",
        r"describe|description|explain|explanation|opinion|feedback|why|comments?|suggest\w*",
        r"|p[eë]rshkru\w*|shpjeg\w*|mendim\w*|pse|koment\w*|sugjer\w*",
        r"|opi[sš]\w*|obja[sš]n\w*|mi[sš]ljenj\w*|za[sš]to|komentar\w*|predlo[zž]\w*",
        r"|опиш\w*|објасн\w*|мишљењ\w*|зашто|коментар\w*|предло\w*",
        r")\b"
    ))
    .unwrap()
});

static OTHER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:other|others|tjet[eë]r|tjera|drugo|ostalo|друго|остало)\b").unwrap()
});

static SPECIFY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        r"specify|please\s+state|write[\s-]+in",
        r"|specifiko\w*|specifiku\w*|cil[eë]so\w*|shkruani|shkruaj",
        r"|navedi\w*|navesti|precizira\w*|upi[sš]i\w*",
        r"|наведи\w*|навести|прецизира\w*|упиши\w*",
        r"|:|_{3,}|\.{3,}|…",
        r")"
    ))
    .unwrap()
});

static BLANK_FILL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{5,}|\.{8,}|…{2,}").unwrap());

static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-_=*~—]\s*){5,}$").unwrap());

static SCALE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:",
        r"^\d{1,2}\s*(?:[-–—]|to|deri|do)\s*\d{1,2}\b",
        r"|^(?:\d{1,2}\s+){2,}\d{1,2}$",
        r"|\b(?:scale|shkall\w*|skal\w*|скал\w*)\b",
        r")"
    ))
    .unwrap()
});

/// A bare yes/no answer in any supported locale. Markers must already be removed.
pub fn is_yes_no_token(text: &str) -> bool {
    YES_NO_REGEX.is_match(text.trim())
}

/// Strong "write your answer here" instruction; triggers the textarea override.
pub fn has_free_response_instruction(text: &str) -> bool {
    FREE_RESPONSE_REGEX.is_match(text)
}

pub fn has_select_all_cue(text: &str) -> bool {
    SELECT_ALL_REGEX.is_match(text)
}

pub fn has_select_one_cue(text: &str) -> bool {
    SELECT_ONE_REGEX.is_match(text)
}

pub fn has_rating_vocabulary(text: &str) -> bool {
    RATING_REGEX.is_match(text)
}

/// Softer free-text vocabulary ("describe", "why", "opinion", ...)
pub fn has_free_text_vocabulary(text: &str) -> bool {
    FREE_TEXT_REGEX.is_match(text)
}

pub fn has_other_token(text: &str) -> bool {
    OTHER_REGEX.is_match(text)
}

/// "please specify", write-in or colon co-signal of a free-text "other" option
pub fn has_specify_cue(text: &str) -> bool {
    SPECIFY_REGEX.is_match(text)
}

pub fn has_blank_fill(text: &str) -> bool {
    BLANK_FILL_REGEX.is_match(text)
}

/// Explicit long-rule separator (`-----`, `=====`, ...)
pub fn is_separator(text: &str) -> bool {
    SEPARATOR_REGEX.is_match(text.trim())
}

/// Numeric scale line (`1 - 5`, `1 2 3 4 5`) or scale vocabulary
pub fn is_scale_line(text: &str) -> bool {
    SCALE_REGEX.is_match(text.trim())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_tokens_across_locales() {
        for token in ["Yes", "no", "Po", "Jo", "Da", "Ne", "Да", "не", "Po."] {
            assert!(is_yes_no_token(token), "{token} should be a yes/no token");
        }
        assert!(!is_yes_no_token("Not sure"));
        assert!(!is_yes_no_token("Nothing"));
    }

    #[test]
    fn free_response_instruction_is_strong_only() {
        assert!(has_free_response_instruction(
            "Ju lutem shkruani përgjigjen tuaj këtu"
        ));
        assert!(has_free_response_instruction(
            "Ju lutem shkruani pergjigjen tuaj ketu"
        ));
        assert!(has_free_response_instruction("Please write your answer here"));
        assert!(has_free_response_instruction(
            "Leave a comment on your choice"
        ));
        assert!(has_free_response_instruction("Molimo napišite vaš odgovor"));
        assert!(has_free_response_instruction("Напишите ваш одговор"));
        assert!(!has_free_response_instruction(
            "Please describe your satisfaction level"
        ));
    }

    #[test]
    fn selection_cues_are_distinct() {
        assert!(has_select_all_cue("Select all that apply"));
        assert!(has_select_all_cue("Zgjidhni të gjitha që vlejnë"));
        assert!(has_select_all_cue("Označite sve što važi"));
        assert!(!has_select_all_cue("Select one"));

        assert!(has_select_one_cue("(Please choose only one of the following:)"));
        assert!(has_select_one_cue("Zgjidhni vetëm një"));
        assert!(has_select_one_cue("Izaberite samo jedan odgovor"));
        assert!(!has_select_one_cue("Select all that apply"));
    }

    #[test]
    fn rating_and_free_text_vocabulary() {
        assert!(has_rating_vocabulary("How satisfied are you with the service?"));
        assert!(has_rating_vocabulary("Sa të kënaqur jeni?"));
        assert!(has_rating_vocabulary("Koliko ste zadovoljni?"));
        assert!(!has_rating_vocabulary("What is your accurate age?"));

        assert!(has_free_text_vocabulary("Please describe the problem"));
        assert!(has_free_text_vocabulary("Pse e zgjodhët këtë?"));
        assert!(has_free_text_vocabulary("Zašto?"));
        assert!(!has_free_text_vocabulary("What is your age?"));
    }

    #[test]
    fn other_and_specify_cues() {
        assert!(has_other_token("Tjetër"));
        assert!(has_other_token("Other (please specify)"));
        assert!(has_other_token("Ostalo"));
        assert!(!has_other_token("Another brother"));

        assert!(has_specify_cue("Other (please specify)"));
        assert!(has_specify_cue("Tjetër:"));
        assert!(has_specify_cue("Drugo, navedite"));
        assert!(!has_specify_cue("Tjetër"));
    }

    #[test]
    fn separators_blank_fills_and_scales() {
        assert!(is_separator("----------"));
        assert!(is_separator("= = = = = ="));
        assert!(!is_separator("- Option"));

        assert!(has_blank_fill("Answer: ______________"));
        assert!(!has_blank_fill("a_b"));

        assert!(is_scale_line("1 - 5"));
        assert!(is_scale_line("1 2 3 4 5"));
        assert!(is_scale_line("Në një shkallë prej 1 deri 5"));
        assert!(!is_scale_line("Yes"));
    }
}
