//! Chemistry engine: walks a draft turn-by-turn, injecting interjections,
//! strong reactions, humor tags and laugh cues

use crate::library::{FORBIDDEN_SLANG, LIBRARY, STRONG_REACTIONS};
use podcast_core::{
    BanterLevel, CallbackRef, EnrichedScript, HumorCue, InterjectionCategory, InterjectionPosition,
    Intent, LaughCue, LaughIntensity, ScriptDraft, Speaker, StylePreset, TurnInterjection,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HumorQaReport {
    pub score: f64,
    pub repeated_interjections: Vec<String>,
    pub strong_reaction_count: u32,
    pub opening_humor_count: u32,
    pub forbidden_slang_found: Vec<String>,
    pub consecutive_interjection_runs: u32,
}

struct RunState {
    usage_count: HashMap<String, u32>,
    last_used_turn: HashMap<String, i64>,
    strong_reaction_count: u32,
    last_interjection_turn: i64,
    recent_humor_turns: VecDeque<(usize, String)>,
    last_laugh_turn: Option<usize>,
    elapsed_sec: f64,
}

impl RunState {
    fn new() -> Self {
        Self {
            usage_count: HashMap::new(),
            last_used_turn: HashMap::new(),
            strong_reaction_count: 0,
            last_interjection_turn: -1000,
            recent_humor_turns: VecDeque::new(),
            last_laugh_turn: None,
            elapsed_sec: 0.0,
        }
    }
}

fn draft_seed(draft: &ScriptDraft) -> u64 {
    let mut hasher = DefaultHasher::new();
    for turn in &draft.turns {
        turn.id.hash(&mut hasher);
        turn.raw_text.hash(&mut hasher);
    }
    hasher.finish()
}

pub struct ChemistryEngine {
    preset: StylePreset,
    banter_level: BanterLevel,
}

impl ChemistryEngine {
    pub fn new(preset: StylePreset, banter_level: BanterLevel) -> Self {
        Self { preset, banter_level }
    }

    /// Walk the draft, producing an [`EnrichedScript`] and a [`HumorQaReport`].
    ///
    /// The RNG is seeded from the draft's own turn ids and text rather than
    /// system entropy, so re-enriching the same unchanged draft places
    /// interjections, reactions and laugh cues identically every time.
    pub fn enrich(&self, draft: ScriptDraft) -> (EnrichedScript, HumorQaReport) {
        let mut state = RunState::new();
        let seed = draft_seed(&draft);
        let mut enriched = EnrichedScript::new(draft);
        let mut rng = StdRng::seed_from_u64(seed);

        let turn_count = enriched.draft.turns.len();
        for i in 0..turn_count {
            let elapsed_before = state.elapsed_sec;

            self.try_inject_interjection(&mut enriched, &mut state, i, &mut rng);
            self.try_strong_reaction(&mut enriched, &mut state, i, elapsed_before, &mut rng);
            self.try_humor_tag(&mut enriched, &mut state, i, elapsed_before, &mut rng);
            self.try_laugh_cue(&mut enriched, &mut state, i, &mut rng);

            state.elapsed_sec += enriched.draft.turns[i].elapsed_contribution_sec();
        }

        enriched.strong_reaction_count = state.strong_reaction_count;
        enriched.interjection_usage = state.usage_count.clone();

        let report = self.validate(&enriched);
        (enriched, report)
    }

    fn injection_probability(&self, speaker: Speaker) -> f64 {
        let base = 0.15 + self.banter_level.value() as f64 * 0.1;
        let preset_factor = match self.preset {
            StylePreset::News => 0.5,
            StylePreset::Deepdive => 0.8,
            StylePreset::Friendly => 1.0,
        };
        let speaker_factor = match speaker {
            Speaker::HostB => 1.0,
            _ => 0.2,
        };
        (base * preset_factor * speaker_factor).min(0.9)
    }

    fn try_inject_interjection(&self, enriched: &mut EnrichedScript, state: &mut RunState, i: usize, rng: &mut impl Rng) {
        let turn = &enriched.draft.turns[i];
        let eligible_intent = matches!(turn.intent, Intent::React | Intent::AskQuestion | Intent::Summarize | Intent::Transition);
        if !eligible_intent {
            return;
        }
        if (i as i64) - state.last_interjection_turn < 2 {
            return;
        }
        if state.elapsed_sec < 30.0 && turn.section_id.contains("opening") {
            return;
        }
        if !rng.gen_bool(self.injection_probability(turn.speaker)) {
            return;
        }

        let category = match turn.intent {
            Intent::React => {
                if rng.gen_bool(0.5) {
                    InterjectionCategory::SurpriseWow
                } else {
                    InterjectionCategory::Empathy
                }
            }
            Intent::AskQuestion => InterjectionCategory::Thinking,
            Intent::Summarize | Intent::Transition => InterjectionCategory::ApprovalRespect,
            _ => return,
        };

        let candidates: Vec<&podcast_core::InterjectionEntry> = LIBRARY
            .iter()
            .filter(|e| e.category == category)
            .filter(|e| e.allowed_speakers.contains(&turn.speaker))
            .filter(|e| *state.usage_count.get(&e.id).unwrap_or(&0) < e.effective_max_usage())
            .filter(|e| (i as i64) - *state.last_used_turn.get(&e.id).unwrap_or(&-1000) >= e.min_turn_gap as i64)
            .filter(|e| !e.forbidden_sections.iter().any(|s| s == &turn.section_id))
            .collect();

        if candidates.is_empty() {
            return;
        }
        let chosen = candidates[rng.gen_range(0..candidates.len())];

        *state.usage_count.entry(chosen.id.clone()).or_insert(0) += 1;
        state.last_used_turn.insert(chosen.id.clone(), i as i64);
        state.last_interjection_turn = i as i64;

        enriched.draft.turns[i].interjection = Some(TurnInterjection {
            text: chosen.text.clone(),
            category: format!("{:?}", chosen.category),
            position: InterjectionPosition::Start,
        });
    }

    fn try_strong_reaction(&self, enriched: &mut EnrichedScript, state: &mut RunState, i: usize, elapsed_before: f64, rng: &mut impl Rng) {
        let turn = &enriched.draft.turns[i];
        if turn.speaker != Speaker::HostB || turn.intent != Intent::React {
            return;
        }
        if elapsed_before < self.preset.opening_no_reaction_sec() {
            return;
        }
        if state.strong_reaction_count >= self.preset.strong_reaction_cap() {
            return;
        }
        if !rng.gen_bool(0.2 + self.banter_level.value() as f64 * 0.1) {
            return;
        }

        let reaction = STRONG_REACTIONS[rng.gen_range(0..STRONG_REACTIONS.len())];
        let turn = &mut enriched.draft.turns[i];
        turn.raw_text = format!("{} {}", reaction, turn.raw_text);
        turn.is_strong_reaction = true;
        state.strong_reaction_count += 1;
    }

    fn try_humor_tag(&self, enriched: &mut EnrichedScript, state: &mut RunState, i: usize, elapsed_before: f64, rng: &mut impl Rng) {
        let turn = &enriched.draft.turns[i];
        let eligible = matches!(turn.intent, Intent::GiveExample | Intent::React | Intent::Transition);
        if !eligible {
            return;
        }
        let recent_count = state.recent_humor_turns.iter().filter(|(idx, _)| i.saturating_sub(*idx) <= 5).count();
        if recent_count > 1 {
            return;
        }
        if !rng.gen_bool(0.1 + self.banter_level.value() as f64 * 0.05) {
            return;
        }

        let humor_type = match turn.intent {
            Intent::GiveExample => "example",
            Intent::React => "react",
            Intent::Transition => "transition",
            _ => "other",
        };
        let callback_reference = state.recent_humor_turns.back().map(|(idx, _)| *idx);
        if let Some(source_idx) = callback_reference {
            let excerpt: String = state
                .recent_humor_turns
                .iter()
                .find(|(idx, _)| *idx == source_idx)
                .map(|(_, text)| text.chars().take(20).collect())
                .unwrap_or_default();
            enriched.callback_refs.push(CallbackRef {
                source_turn_index: source_idx,
                target_turn_index: i,
                joke_excerpt: excerpt,
            });
        }

        enriched.humor_cues.push(HumorCue {
            humor_type: humor_type.to_string(),
            target_turn_index: i,
            callback_reference,
        });

        let turn = &mut enriched.draft.turns[i];
        turn.humor_tag = Some(format!("humor-{humor_type}-{i}"));
        if elapsed_before < 90.0 {
            turn.humor_tag = Some(format!("humor-{humor_type}-{i}-opening"));
        }

        state.recent_humor_turns.push_back((i, turn.raw_text.clone()));
        while state.recent_humor_turns.len() > 5 {
            state.recent_humor_turns.pop_front();
        }
    }

    fn try_laugh_cue(&self, enriched: &mut EnrichedScript, state: &mut RunState, i: usize, rng: &mut impl Rng) {
        let turn = &enriched.draft.turns[i];
        if turn.humor_tag.is_none() {
            return;
        }
        if let Some(last) = state.last_laugh_turn {
            if i.saturating_sub(last) <= 3 {
                return;
            }
        }

        let strength: f64 = rng.gen();
        let intensity = if strength < 0.4 {
            LaughIntensity::LightChuckle
        } else if strength < 0.8 {
            LaughIntensity::SoftLaugh
        } else {
            LaughIntensity::BigLaugh
        };
        let duration_ms = match intensity {
            LaughIntensity::LightChuckle => 500,
            LaughIntensity::SoftLaugh => 900,
            LaughIntensity::BigLaugh => 1500,
        };

        enriched.laugh_cues.push(LaughCue {
            intensity,
            insert_after_turn_index: i,
            duration_ms,
            volume_offset_db: -8.0,
        });

        let turn = &mut enriched.draft.turns[i];
        turn.laugh_cue_id = Some(format!("laugh-{i}"));
        state.last_laugh_turn = Some(i);
    }

    fn validate(&self, enriched: &EnrichedScript) -> HumorQaReport {
        let mut score: f64 = 100.0;

        let repeated_interjections: Vec<String> = LIBRARY
            .iter()
            .filter(|e| *enriched.interjection_usage.get(&e.id).unwrap_or(&0) > e.effective_max_usage())
            .map(|e| e.id.clone())
            .collect();
        score -= 10.0 * repeated_interjections.len() as f64;

        if enriched.strong_reaction_count > 2 {
            score -= 20.0;
        }

        let opening_humor_count = enriched
            .draft
            .turns
            .iter()
            .filter(|t| t.humor_tag.as_deref().map(|h| h.ends_with("-opening")).unwrap_or(false))
            .count() as u32;
        if opening_humor_count > 1 {
            score -= 15.0;
        }

        let mut forbidden_slang_found = Vec::new();
        for turn in &enriched.draft.turns {
            for term in FORBIDDEN_SLANG.iter() {
                if turn.raw_text.contains(term) {
                    forbidden_slang_found.push((*term).to_string());
                }
            }
        }
        score -= 5.0 * forbidden_slang_found.len() as f64;

        let mut consecutive_interjection_runs = 0u32;
        for pair in enriched.draft.turns.windows(2) {
            if pair[0].interjection.is_some() && pair[1].interjection.is_some() {
                consecutive_interjection_runs += 1;
            }
        }
        score -= 10.0 * consecutive_interjection_runs as f64;

        HumorQaReport {
            score: score.max(0.0),
            repeated_interjections,
            strong_reaction_count: enriched.strong_reaction_count,
            opening_humor_count,
            forbidden_slang_found,
            consecutive_interjection_runs,
        }
    }
}
