//! Static interjection library, strong-reaction table, and forbidden-slang
//! list

use once_cell::sync::Lazy;
use podcast_core::{InterjectionCategory, InterjectionEntry, Intensity, Speaker};

fn entry(id: &str, text: &str, category: InterjectionCategory, intensity: Intensity, max_usage: u32, min_gap: usize) -> InterjectionEntry {
    InterjectionEntry {
        id: id.to_string(),
        text: text.to_string(),
        category,
        intensity,
        allowed_speakers: vec![Speaker::HostA, Speaker::HostB],
        max_usage_per_episode: max_usage,
        min_turn_gap: min_gap,
        forbidden_sections: Vec::new(),
    }
}

/// At least 15 entries per non-laugh category, so the usage caps and
/// turn-gap rules don't exhaust a category during a long episode.
pub static LIBRARY: Lazy<Vec<InterjectionEntry>> = Lazy::new(|| {
    vec![
        // SurpriseWow
        entry("sw-01", "와", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-02", "헐", InterjectionCategory::SurpriseWow, Intensity::Medium, 3, 2),
        entry("sw-03", "대박", InterjectionCategory::SurpriseWow, Intensity::Strong, 2, 3),
        entry("sw-04", "진짜요?", InterjectionCategory::SurpriseWow, Intensity::Medium, 3, 2),
        entry("sw-05", "어머", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-06", "세상에", InterjectionCategory::SurpriseWow, Intensity::Strong, 2, 3),
        entry("sw-07", "우와", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-08", "이야", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-09", "헉", InterjectionCategory::SurpriseWow, Intensity::Medium, 3, 2),
        entry("sw-10", "어엇", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-11", "와우", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        entry("sw-12", "설마", InterjectionCategory::SurpriseWow, Intensity::Medium, 3, 2),
        entry("sw-13", "말도 안돼", InterjectionCategory::SurpriseWow, Intensity::Strong, 2, 3),
        entry("sw-14", "정말요?", InterjectionCategory::SurpriseWow, Intensity::Medium, 3, 2),
        entry("sw-15", "놀랍네요", InterjectionCategory::SurpriseWow, Intensity::Weak, 4, 2),
        // ApprovalRespect
        entry("ar-01", "맞아요", InterjectionCategory::ApprovalRespect, Intensity::Medium, 2, 2),
        entry("ar-02", "그렇죠", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-03", "역시", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-04", "정확해요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-05", "맞습니다", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-06", "그러게요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-07", "인정", InterjectionCategory::ApprovalRespect, Intensity::Medium, 3, 2),
        entry("ar-08", "좋은 지적이에요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 3, 3),
        entry("ar-09", "동의해요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-10", "맞는 말씀이에요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 3, 3),
        entry("ar-11", "그렇군요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-12", "옳소", InterjectionCategory::ApprovalRespect, Intensity::Medium, 2, 3),
        entry("ar-13", "완전 공감", InterjectionCategory::ApprovalRespect, Intensity::Medium, 3, 2),
        entry("ar-14", "딱이네요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        entry("ar-15", "맞네요", InterjectionCategory::ApprovalRespect, Intensity::Weak, 4, 2),
        // Empathy
        entry("em-01", "그렇겠네요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-02", "힘드셨겠어요", InterjectionCategory::Empathy, Intensity::Medium, 3, 3),
        entry("em-03", "이해해요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-04", "충분히 그럴 수 있죠", InterjectionCategory::Empathy, Intensity::Weak, 3, 3),
        entry("em-05", "저도 그래요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-06", "공감돼요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-07", "마음이 쓰이네요", InterjectionCategory::Empathy, Intensity::Medium, 2, 3),
        entry("em-08", "그런 마음 알아요", InterjectionCategory::Empathy, Intensity::Weak, 3, 3),
        entry("em-09", "저런", InterjectionCategory::Empathy, Intensity::Medium, 3, 2),
        entry("em-10", "안타깝네요", InterjectionCategory::Empathy, Intensity::Medium, 3, 3),
        entry("em-11", "그럴 만하네요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-12", "위로가 되네요", InterjectionCategory::Empathy, Intensity::Weak, 3, 3),
        entry("em-13", "마음 아프네요", InterjectionCategory::Empathy, Intensity::Strong, 1, 4),
        entry("em-14", "그랬군요", InterjectionCategory::Empathy, Intensity::Weak, 4, 2),
        entry("em-15", "속상하셨겠어요", InterjectionCategory::Empathy, Intensity::Medium, 2, 3),
        // Thinking
        entry("th-01", "음", InterjectionCategory::Thinking, Intensity::Weak, 5, 1),
        entry("th-02", "그러니까", InterjectionCategory::Thinking, Intensity::Weak, 4, 2),
        entry("th-03", "잠시만요", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-04", "어디 보자", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-05", "그게 말이죠", InterjectionCategory::Thinking, Intensity::Weak, 4, 2),
        entry("th-06", "흐음", InterjectionCategory::Thinking, Intensity::Weak, 4, 2),
        entry("th-07", "생각해보면", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-08", "그러게 말이에요", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-09", "한번 볼까요", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-10", "그러니까요", InterjectionCategory::Thinking, Intensity::Weak, 4, 2),
        entry("th-11", "어떻게 보면", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        entry("th-12", "곰곰이 생각해보면", InterjectionCategory::Thinking, Intensity::Weak, 2, 4),
        entry("th-13", "그게", InterjectionCategory::Thinking, Intensity::Weak, 5, 1),
        entry("th-14", "흠", InterjectionCategory::Thinking, Intensity::Weak, 5, 1),
        entry("th-15", "따져보면", InterjectionCategory::Thinking, Intensity::Weak, 3, 3),
        // LaughCue-category interjections (spoken laugh markers, separate from LaughCue audio cues)
        entry("lc-01", "하하", InterjectionCategory::LaughCue, Intensity::Weak, 3, 3),
        entry("lc-02", "푸하하", InterjectionCategory::LaughCue, Intensity::Strong, 1, 4),
        entry("lc-03", "호호", InterjectionCategory::LaughCue, Intensity::Weak, 3, 3),
        entry("lc-04", "큭큭", InterjectionCategory::LaughCue, Intensity::Medium, 2, 3),
        entry("lc-05", "풉", InterjectionCategory::LaughCue, Intensity::Medium, 2, 3),
        entry("lc-06", "하핫", InterjectionCategory::LaughCue, Intensity::Weak, 3, 3),
    ]
});

/// Prepended to a turn's rawText when a strong reaction fires.
pub static STRONG_REACTIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "진짜 대박이네요!",
        "헐 이거 실화예요?",
        "와 이건 몰랐어요!",
        "세상에 이럴 수가!",
        "진짜요? 소름 돋는데요!",
        "대박 이거 실화인가요!",
        "와 완전 신기하다!",
        "헉 이건 충격적인데요!",
    ]
});

/// ~25 internet-meme terms rejected by the forbidden-slang check.
pub static FORBIDDEN_SLANG: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "ㅋㅋㅋ", "ㄹㅇ", "존맛탱", "개이득", "TMI", "ㅇㅈ", "갑분싸", "핵인싸", "아싸", "노잼",
        "꿀잼", "사바사", "인싸템", "급식체", "웃프다", "답정너", "어그로", "관종", "띵작",
        "정줄놓", "영앤리치", "흑우", "좋못사", "허버허버", "복세편살", "레전드",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn count(category: InterjectionCategory) -> usize {
        LIBRARY.iter().filter(|e| e.category == category).count()
    }

    #[test]
    fn every_non_laugh_category_has_at_least_fifteen_entries() {
        assert!(count(InterjectionCategory::SurpriseWow) >= 15);
        assert!(count(InterjectionCategory::ApprovalRespect) >= 15);
        assert!(count(InterjectionCategory::Empathy) >= 15);
        assert!(count(InterjectionCategory::Thinking) >= 15);
    }

    #[test]
    fn forbidden_slang_has_around_twenty_five_entries() {
        assert!(FORBIDDEN_SLANG.len() >= 20);
    }

    #[test]
    fn maeayo_entry_is_present_for_the_three_cap_exception() {
        assert!(LIBRARY.iter().any(|e| e.text == "맞아요"));
    }
}
