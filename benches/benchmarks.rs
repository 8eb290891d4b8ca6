// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// The hot local paths: score parsing (runs once per evaluation), prompt
// construction (once per request), idea-list parsing (once per ideas call),
// and campaign inserts.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rusqlite::Connection;

use copybloom::generate::{parse_video_ideas, CopyBrief, ScriptBrief};
use copybloom::quality::parser::extract_score;
use copybloom::store::schema::run_migrations;
use copybloom::store::{Campaign, Store};

fn setup_store() -> Store {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    run_migrations(&conn).expect("run migrations");
    Store::new(conn)
}

fn bench_extract_score(c: &mut Criterion) {
    let replies = [
        "8",
        "Score: 7/10, well done",
        "I would rate this content a solid 9 out of 10 because it is persuasive",
        "no digits anywhere in this reply at all",
    ];

    c.bench_function("extract_score", |b| {
        b.iter(|| {
            for reply in &replies {
                black_box(extract_score(black_box(reply)));
            }
        })
    });
}

fn bench_prompt_construction(c: &mut Criterion) {
    let copy_brief = CopyBrief {
        campaign_type: "landing page".into(),
        audience: "small business owners".into(),
        message: "Save hours every week on invoicing".into(),
        tone: "friendly but professional".into(),
        cta: "Start your free trial".into(),
    };

    let script_brief = ScriptBrief {
        topic: "Passive income strategies".into(),
        audience: "students".into(),
        tone: "upbeat".into(),
        duration: "8".into(),
        style: "explainer".into(),
        hook_question: Some("What if rent paid itself?".into()),
        pain_point: Some("Never enough at month end".into()),
        key_points: Some("1. Start small 2. Reinvest 3. Automate".into()),
        backstory: Some("Started with nothing in a dorm room".into()),
        call_to_action: Some("Subscribe for part two".into()),
        ..Default::default()
    };

    c.bench_function("copy_prompt", |b| {
        b.iter(|| black_box(copy_brief.prompt()))
    });

    c.bench_function("script_prompt", |b| {
        b.iter(|| black_box(script_brief.prompt()))
    });
}

fn bench_parse_video_ideas(c: &mut Criterion) {
    let mut reply = String::new();
    for i in 1..=10 {
        reply.push_str(&format!(
            "{i}. How I Automated My Entire Workflow\n\
             This video covers the exact tools and the order to adopt them. \
             Viewers leave with a working setup.\n\
             Target audience: solo founders and freelancers\n\n"
        ));
    }

    c.bench_function("parse_video_ideas", |b| {
        b.iter(|| black_box(parse_video_ideas(black_box(&reply))))
    });
}

fn bench_campaign_insert(c: &mut Criterion) {
    let store = setup_store();
    let content = "Final campaign copy. ".repeat(50);

    c.bench_function("campaign_insert", |b| {
        b.iter(|| {
            let campaign = Campaign::new(
                "copy",
                "bench campaign",
                r#"{"campaign_type":"email"}"#.to_string(),
                content.clone(),
            )
            .with_score(8);
            store.insert_campaign(&campaign).expect("insert");
        })
    });
}

criterion_group!(
    benches,
    bench_extract_score,
    bench_prompt_construction,
    bench_parse_video_ideas,
    bench_campaign_insert,
);
criterion_main!(benches);
