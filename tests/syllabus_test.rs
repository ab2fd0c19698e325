// tests/syllabus_test.rs

mod common;

use common::{FakeSession, course_session, syllabus_url};
use coursera_dl::{
    config::AppConfig,
    error::AppError,
    extractor::{LocatorPreferences, SubtitleLanguage, SyllabusParser, VideoLocator},
    models::{EventLog, Resource, ResourceKey, ResourceKind, RunEvent},
};

fn prefs(language: SubtitleLanguage, resolution: &str) -> LocatorPreferences {
    LocatorPreferences {
        subtitle_language: language,
        resolution: resolution.to_string(),
    }
}

fn slugs<T>(items: &[T], slug: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| slug(i).to_string()).collect()
}

#[tokio::test]
async fn test_parser_builds_pruned_tree() {
    let config = AppConfig::default();
    let session = course_session(&config, "ml-005");
    let preferences = prefs(SubtitleLanguage::All, "540p");
    let parser = SyllabusParser::new(VideoLocator::new(&session, &config), &preferences, false);
    let page = std::fs::read_to_string("tests/fixtures/syllabus_response.json").unwrap();

    let mut events = EventLog::new();
    let course = parser
        .parse("ml-005", &syllabus_url(&config, "ml-005"), &page, &mut events)
        .await
        .unwrap();

    // week-3 没有讲座，extras 只有问卷，都被剪除
    assert_eq!(slugs(&course.modules, |m| &m.slug), vec!["week-1", "week-2"]);
    let week1 = &course.modules[0];
    assert_eq!(slugs(&week1.sections, |s| &s.slug), vec!["intro"]);
    assert_eq!(slugs(&week1.sections[0].lectures, |l| &l.slug), vec!["welcome"]);
    let week2 = &course.modules[1];
    assert_eq!(slugs(&week2.sections[0].lectures, |l| &l.slug), vec!["linear"]);

    let welcome = &week1.sections[0].lectures[0].resources;
    let keys: Vec<String> = welcome.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["mp4", "en.srt", "de.srt", "en.txt"]);
    assert_eq!(
        welcome.get(&ResourceKey::video()).unwrap(),
        &[Resource::untitled("https://cdn.example.org/v1/540.mp4")]
    );
    assert_eq!(
        welcome.get(&ResourceKey::subtitle("en")).unwrap()[0].url,
        "https://www.coursera.org/api/subtitleAssetProxy.v1/v1-en?format=srt"
    );

    // 测验条目不会触发元数据请求
    assert!(!session.requests.lock().unwrap().iter().any(|u| u.contains("q1")));

    let unresolved: Vec<&str> = events
        .events()
        .iter()
        .filter_map(|e| match e {
            RunEvent::LectureUnresolved { lecture, .. } => Some(lecture.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(unresolved, vec!["missing-video", "broken"]);
}

#[tokio::test]
async fn test_parser_reverses_module_order_only() {
    let config = AppConfig::default();
    let session = course_session(&config, "ml-005");
    let preferences = prefs(SubtitleLanguage::All, "540p");
    let parser = SyllabusParser::new(VideoLocator::new(&session, &config), &preferences, true);
    let page = std::fs::read_to_string("tests/fixtures/syllabus_response.json").unwrap();

    let course = parser
        .parse("ml-005", "unused", &page, &mut EventLog::new())
        .await
        .unwrap();
    assert_eq!(slugs(&course.modules, |m| &m.slug), vec!["week-2", "week-1"]);
    assert_eq!(course.modules[1].sections[0].slug, "intro");
}

#[tokio::test]
async fn test_resolution_and_language_fallbacks_are_reported() {
    let config = AppConfig::default();
    let session = course_session(&config, "ml-005");
    let preferences = prefs(SubtitleLanguage::Code("fr".to_string()), "720p");
    let parser = SyllabusParser::new(VideoLocator::new(&session, &config), &preferences, false);
    let page = std::fs::read_to_string("tests/fixtures/syllabus_response.json").unwrap();

    let mut events = EventLog::new();
    let course = parser
        .parse("ml-005", "unused", &page, &mut events)
        .await
        .unwrap();

    let welcome = &course.modules[0].sections[0].lectures[0].resources;
    let keys: Vec<String> = welcome.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["mp4", "en.srt", "en.txt"]);
    assert_eq!(
        welcome.get(&ResourceKey::video()).unwrap()[0].url,
        "https://cdn.example.org/v1/720.mp4"
    );

    let linear = &course.modules[1].sections[0].lectures[0].resources;
    assert_eq!(
        linear.get(&ResourceKey::video()).unwrap()[0].url,
        "https://cdn.example.org/v2/540.mp4"
    );

    assert!(events.events().contains(&RunEvent::ResolutionFallback {
        video_id: "v2".to_string(),
        requested: "720p".to_string(),
        chosen: "540p".to_string(),
    }));
    assert!(events.events().contains(&RunEvent::LanguageFallback {
        video_id: "v1".to_string(),
        kind: ResourceKind::Transcript,
        requested: "fr".to_string(),
    }));
}

#[tokio::test]
async fn test_malformed_syllabus_is_reported() {
    let config = AppConfig::default();
    let session = FakeSession::new();
    let preferences = prefs(SubtitleLanguage::All, "540p");
    let parser = SyllabusParser::new(VideoLocator::new(&session, &config), &preferences, false);

    let result = parser
        .parse("ml-005", "http://x/syllabus", "{\"elements\": []}", &mut EventLog::new())
        .await;
    assert!(matches!(result, Err(AppError::ApiParseFailed { url, .. }) if url == "http://x/syllabus"));
}

#[tokio::test]
async fn test_transport_errors_abort_parsing() {
    let config = AppConfig::default();
    // 没有准备视频元数据页面
    let session = FakeSession::new();
    let preferences = prefs(SubtitleLanguage::All, "540p");
    let parser = SyllabusParser::new(VideoLocator::new(&session, &config), &preferences, false);
    let page = std::fs::read_to_string("tests/fixtures/syllabus_response.json").unwrap();

    let result = parser
        .parse("ml-005", "unused", &page, &mut EventLog::new())
        .await;
    assert!(matches!(result, Err(AppError::Other(_))));
}
