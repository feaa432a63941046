#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

/// Builds a `streamGenerateContent?alt=sse` response body where every
/// fragment is delivered as its own server-sent event.
pub fn gemini_sse_fixture(fragments: &[&str]) -> String {
    return fragments
        .iter()
        .map(|fragment| {
            let chunk = serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": fragment }]
                    },
                    "index": 0
                }]
            });

            return format!("data: {chunk}\r\n\r\n");
        })
        .collect::<Vec<String>>()
        .join("");
}

pub fn weekly_report_fixture() -> &'static str {
    return r#"
本周 GMV 环比下降 12%，主要原因如下：

1. 主力 ASIN B0XXXX 断货 3 天
2. 广告 ACOS 从 25% 升至 38%

Next steps: restock the hero ASIN and pause the low-converting campaigns before Friday.
"#
    .trim();
}
