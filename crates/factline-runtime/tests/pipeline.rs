//! End-to-end fact-check against mocked upstream services.

use factline_core::{Region, ReportFormatter, Stance, Verdict};
use factline_runtime::providers::{ApiCredential, CredentialSource};
use factline_runtime::{Endpoints, FactCheckConfig, FactChecker, Feeds, Settings};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, news_key: Option<&str>) -> FactCheckConfig {
    let uri = server.uri();
    let settings = Settings {
        provider_timeout: Duration::from_secs(5),
        llm_timeout: Duration::from_secs(5),
        endpoints: Endpoints {
            instant_answer: format!("{uri}/ia/"),
            web_search: format!("{uri}/html/"),
            news_api: format!("{uri}/v2"),
            gemini: format!("{uri}/v1beta"),
        },
        feeds: Feeds {
            local: vec![format!("{uri}/rss/ndtv.xml")],
            international: vec![format!("{uri}/rss/bbc.xml")],
        },
        ..Settings::default()
    };

    let mut config = FactCheckConfig::new(ApiCredential::new(
        "test-gemini-key",
        CredentialSource::Programmatic,
        "Gemini API key",
    ))
    .with_settings(settings);

    if let Some(key) = news_key {
        config = config.with_news_api_key(ApiCredential::new(key, CredentialSource::Programmatic, "NewsAPI key"));
    }
    config
}

fn gemini_reply(analysis: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": analysis.to_string()}]},
            "finishReason": "STOP"
        }]
    }))
}

async fn mount_gemini(server: &MockServer, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(reply)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fabricated_headline_end_to_end() {
    let server = MockServer::start().await;

    // Every search comes up empty
    Mock::given(method("GET"))
        .and(path("/ia/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Abstract": "", "RelatedTopics": []}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    mount_gemini(
        &server,
        gemini_reply(json!({
            "truthfulness": 1,
            "confidence": 97,
            "analysis": "There is no report of any nuclear detonation in Munich.",
            "concerns": ["Fabricated event", "Sensationalized claim"],
            "recommendations": "Treat this headline as false."
        })),
    )
    .await;

    let checker = FactChecker::from_config(config(&server, None)).unwrap();
    let report = checker.fact_check("Munich got nuked today").await.unwrap();

    assert_eq!(report.verdict(), Verdict::False);
    assert_eq!(report.truthfulness(), 1);
    assert!(report.evidence().is_fallback());
    assert_eq!(report.evidence().items()[0].stance(), Stance::Contradicts);

    let text = ReportFormatter::format(&report);
    assert!(text.contains("FINAL VERDICT: FALSE (1% ACCURATE)"));
    assert!(text.contains("\"Munich got nuked today\""));
    assert!(text.contains("Fallback Search"));
}

#[tokio::test]
async fn test_model_outage_yields_unverified_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ia/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            json!({
                "Heading": "Mumbai",
                "Abstract": "Mumbai is the capital of Maharashtra.",
                "AbstractURL": "https://en.wikipedia.org/wiki/Mumbai",
                "AbstractSource": "Wikipedia",
                "RelatedTopics": []
            })
            .to_string(),
        ))
        .mount(&server)
        .await;
    mount_gemini(&server, ResponseTemplate::new(500).set_body_string("internal")).await;

    let checker = FactChecker::from_config(config(&server, None)).unwrap();
    let report = checker.fact_check("Heavy rain floods Mumbai").await.unwrap();

    assert_eq!(report.verdict(), Verdict::Unverified);
    assert_eq!(report.confidence(), 0.0);
    assert_eq!(report.evidence().len(), 1);
    assert_eq!(report.evidence().items()[0].source(), "Wikipedia");
    assert!(report.analysis().is_fallback());
}

#[tokio::test]
async fn test_trending_falls_back_to_rss() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rss/bbc.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<rss><channel><title>BBC News</title>
               <item><title>Leaders meet for climate summit</title>
                 <link>https://www.bbc.co.uk/news/1</link>
                 <description>Talks open in Geneva.</description></item>
               </channel></rss>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let checker = FactChecker::from_config(config(&server, Some("test-news-key"))).unwrap();
    let report = checker.trending_topics(Region::International).await;

    assert_eq!(report.topics.len(), 1);
    assert_eq!(report.topics[0].title, "Leaders meet for climate summit");
    assert_eq!(report.topics[0].description, "Talks open in Geneva.");

    let text = ReportFormatter::format_trending(&report);
    assert!(text.contains("Leaders meet for climate summit"));
}

#[tokio::test]
async fn test_status_reflects_news_key() {
    let server = MockServer::start().await;

    let without = FactChecker::from_config(config(&server, None)).unwrap().status();
    let with = FactChecker::from_config(config(&server, Some("k"))).unwrap().status();

    let news = |s: &factline_core::ServiceStatus| {
        s.providers
            .iter()
            .find(|p| p.name == "NewsAPI")
            .map(|p| p.configured)
    };
    assert_eq!(news(&without), Some(false));
    assert_eq!(news(&with), Some(true));
    assert!(without.is_operational());
}
