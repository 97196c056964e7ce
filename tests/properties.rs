use proptest::prelude::*;
use prompt_diff::*;

fn weight_of(reason: &str) -> u32 {
    match reason {
        REASON_NO_ROLE => 3,
        REASON_TOO_SHORT => 2,
        REASON_TOO_LONG => 1,
        REASON_NO_CONSTRAINTS => 2,
        REASON_OVER_CONSTRAINED => 1,
        REASON_NO_UNCERTAINTY => 1,
        REASON_EXCESSIVE_UNCERTAINTY => 1,
        other => panic!("unexpected reason: {other}"),
    }
}

/// Prompts built from lexicon words, role markers and filler so every rule
/// branch gets exercised.
fn prompt_strategy() -> impl Strategy<Value = String> {
    let vocab = vec![
        "must", "Always", "never", "strict", "EXACTLY", "only", "might", "maybe", "could",
        "possibly", "generally", "you are", "act as", "mustard", "the", "answer", "briefly",
        "\n", "\t",
    ];
    prop::collection::vec(prop::sample::select(vocab), 0..300).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn score_is_capped_sum_of_weights(text in prompt_strategy()) {
        let result = analyze(&text);
        let raw: u32 = result.risk_reasons.iter().map(|r| weight_of(r)).sum();
        prop_assert!(result.risk_score <= 10);
        prop_assert_eq!(result.risk_score, raw.min(10));
        prop_assert!(result.risk_reasons.len() <= 4);
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".*") {
        let result = analyze(&text);
        prop_assert!(result.risk_score <= 10);
        prop_assert_eq!(result.token_count, text.split_whitespace().count());
    }

    #[test]
    fn analyze_is_deterministic(text in prompt_strategy()) {
        prop_assert_eq!(analyze(&text), analyze(&text));
    }

    #[test]
    fn self_diff_is_empty(text in prompt_strategy()) {
        let result = analyze(&text);
        prop_assert!(diff(&result, &result).is_empty());
    }

    #[test]
    fn token_insight_flips_with_direction(a in prompt_strategy(), b in prompt_strategy()) {
        let (ra, rb) = (analyze(&a), analyze(&b));
        let forward = diff(&ra, &rb);
        let backward = diff(&rb, &ra);
        let more = |v: &Vec<String>| v.iter().any(|i| i == INSIGHT_MORE_TOKENS);
        let fewer = |v: &Vec<String>| v.iter().any(|i| i == INSIGHT_FEWER_TOKENS);

        prop_assert_eq!(more(&forward), fewer(&backward));
        prop_assert_eq!(fewer(&forward), more(&backward));
        prop_assert_eq!(more(&forward) || fewer(&forward), ra.token_count != rb.token_count);
    }

    #[test]
    fn compare_delta_matches_token_counts(a in prompt_strategy(), b in prompt_strategy()) {
        let report = compare(&a, &b);
        prop_assert_eq!(
            report.delta,
            report.analysis_b.token_count as i64 - report.analysis_a.token_count as i64
        );
        prop_assert_eq!(report.risk_band, risk_band(report.risk));
    }

    #[test]
    fn risk_band_is_monotonic(score in 0u32..=10) {
        let rank = |band: RiskBand| match band {
            RiskBand::Low => 0,
            RiskBand::Moderate => 1,
            RiskBand::High => 2,
        };
        prop_assert!(rank(risk_band(score)) <= rank(risk_band(score + 1)));
    }
}
