//! Built-in sample content so the server is useful straight away: a small
//! onomatopoeia quiz inserted when the store starts empty. Seeding never
//! overwrites anything an author created.

use tracing::{info, instrument};

use crate::domain::{OtherChoice, QuestionDraft};
use crate::error::AppError;
use crate::store::QuizStore;

pub const SAMPLE_QUIZ_TITLE: &str = "オノマトペ入門";

fn q(
    prompt: &str,
    sentence: &str,
    choices: [&str; 3],
    correct_index: usize,
    explanation: &str,
    others: [(&str, &str, &str); 2],
) -> QuestionDraft {
    QuestionDraft {
        id: None,
        prompt: prompt.into(),
        sentence: sentence.into(),
        choices: choices.iter().map(|s| s.to_string()).collect(),
        correct_index: Some(correct_index),
        explanation: explanation.into(),
        others: others
            .iter()
            .map(|(word, usage, example)| OtherChoice {
                word: word.to_string(),
                usage: usage.to_string(),
                example: example.to_string(),
            })
            .collect(),
        image_url: String::new(),
    }
}

pub fn sample_questions() -> Vec<QuestionDraft> {
    vec![
        q(
            "この状況に合う言葉は？",
            "雨が（　　）降っている。",
            ["ざあざあ", "にこにこ", "ぐっすり"],
            0,
            "「ざあざあ」は強い雨が降り続く音を表すオノマトペです。",
            [
                ("にこにこ", "嬉しそうに笑っている様子", "彼女はにこにこ笑っている。"),
                ("ぐっすり", "深く眠っている様子", "赤ちゃんはぐっすり眠っている。"),
            ],
        ),
        q(
            "気持ちを表す言葉は？",
            "明日の遠足が楽しみで（　　）する。",
            ["わくわく", "ぺこぺこ", "きらきら"],
            0,
            "「わくわく」は期待や喜びで心が弾む様子を表します。",
            [
                ("ぺこぺこ", "お腹がとても空いている様子", "朝から何も食べていなくてお腹がぺこぺこだ。"),
                ("きらきら", "光が美しく輝く様子", "星がきらきら光っている。"),
            ],
        ),
        q(
            "お腹の状態を表す言葉は？",
            "お昼を食べそこねて、お腹が（　　）だ。",
            ["ふわふわ", "ぺこぺこ", "どきどき"],
            1,
            "「ぺこぺこ」は空腹でお腹がへこんだ様子を表します。",
            [
                ("ふわふわ", "軽くて柔らかい様子", "このパンはふわふわしている。"),
                ("どきどき", "緊張や興奮で心臓が鳴る様子", "発表の前でどきどきする。"),
            ],
        ),
        q(
            "眠り方を表す言葉は？",
            "昨日は（　　）眠れたので、今朝は元気いっぱいだ。",
            ["うとうと", "ぐっすり", "ごろごろ"],
            1,
            "「ぐっすり」は深くよく眠る様子を表します。",
            [
                ("うとうと", "浅く眠りかけている様子", "授業中にうとうとしてしまった。"),
                ("ごろごろ", "何もせず横になって過ごす様子", "休日は家でごろごろしていた。"),
            ],
        ),
        q(
            "笑い方を表す言葉は？",
            "先生はいつも（　　）していて優しい。",
            ["にこにこ", "いらいら", "ひやひや"],
            0,
            "「にこにこ」は穏やかに笑顔でいる様子を表します。",
            [
                ("いらいら", "思い通りにならず苛立つ様子", "渋滞でいらいらする。"),
                ("ひやひや", "危なっかしくて不安な様子", "細い道を走る車にひやひやした。"),
            ],
        ),
    ]
}

/// Insert the sample quiz when the store is empty. Startup proceeds on
/// failure; the seed is a convenience, not a requirement.
#[instrument(level = "info", skip(store))]
pub async fn ensure_sample_quiz(store: &QuizStore) -> Result<(), AppError> {
    if !store.is_empty().await {
        return Ok(());
    }
    let quiz = store
        .create_quiz(SAMPLE_QUIZ_TITLE, sample_questions())
        .await?;
    info!(target: "quiz", id = %quiz.id, "Inserted built-in sample quiz");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_quiz_passes_validation_and_seeds_once() {
        let store = QuizStore::in_memory();
        ensure_sample_quiz(&store).await.expect("seed should validate");
        let items = store.list_quizzes().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question_count, 5);

        // Second call is a no-op.
        ensure_sample_quiz(&store).await.unwrap();
        assert_eq!(store.list_quizzes().await.len(), 1);
    }
}
