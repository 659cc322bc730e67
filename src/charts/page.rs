use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::{json, Value};

use super::aggregate::{Bucket, ChartAggregate};

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

pub const STATUS_CHART_FILE: &str = "status_chart.html";
pub const LABELS_CHART_FILE: &str = "labels_chart.html";
pub const TIMELINE_CHART_FILE: &str = "timeline_chart.html";
pub const INDEX_FILE: &str = "index.html";

/// Serialize a chart option so it can sit inside a `<script>` element
fn script_json(option: &Value) -> String {
    option.to_string().replace("</", "<\\/")
}

fn names(buckets: &[Bucket]) -> Vec<&str> {
    buckets.iter().map(|b| b.name.as_str()).collect()
}

fn counts(buckets: &[Bucket]) -> Vec<usize> {
    buckets.iter().map(|b| b.count).collect()
}

/// Pie chart of issue states with percentage labels
pub fn status_option(aggregate: &ChartAggregate) -> Value {
    let data: Vec<Value> = aggregate
        .status
        .iter()
        .map(|b| json!({ "name": b.name, "value": b.count }))
        .collect();

    json!({
        "title": { "text": "Issue Status Distribution", "subtext": format!("Total: {}", aggregate.total) },
        "tooltip": { "show": true, "trigger": "item" },
        "legend": { "show": true, "top": "bottom" },
        "series": [{
            "name": "State",
            "type": "pie",
            "radius": ["40%", "70%"],
            "label": { "show": true, "formatter": "{b}: {c} ({d}%)" },
            "data": data
        }]
    })
}

/// Bar chart of the most used labels
pub fn labels_option(aggregate: &ChartAggregate) -> Value {
    json!({
        "title": { "text": "Issue Label Distribution", "subtext": format!("Top {} labels", aggregate.labels.len()) },
        "tooltip": { "show": true },
        "legend": { "show": false },
        "xAxis": { "type": "category", "name": "Label", "data": names(&aggregate.labels), "axisLabel": { "rotate": 45 } },
        "yAxis": { "type": "value", "name": "Count" },
        "series": [{
            "name": "Count",
            "type": "bar",
            "label": { "show": true, "position": "top" },
            "data": counts(&aggregate.labels)
        }]
    })
}

/// Smoothed line of issues created per month, with extremes, average and zoom
pub fn timeline_option(aggregate: &ChartAggregate) -> Value {
    let subtext = match (aggregate.monthly.first(), aggregate.monthly.last()) {
        (Some(first), Some(last)) => format!("From {} to {}", first.name, last.name),
        _ => "No issues".to_string(),
    };

    json!({
        "title": { "text": "Issue Creation Trend", "subtext": subtext },
        "tooltip": { "show": true, "trigger": "axis" },
        "legend": { "show": true, "top": "bottom" },
        "xAxis": { "type": "category", "name": "Month", "data": names(&aggregate.monthly), "axisLabel": { "rotate": 45 } },
        "yAxis": { "type": "value", "name": "Count" },
        "dataZoom": [
            { "type": "inside", "start": 0, "end": 100 },
            { "type": "slider", "start": 0, "end": 100 }
        ],
        "series": [{
            "name": "New issues",
            "type": "line",
            "smooth": true,
            "label": { "show": true },
            "markPoint": { "data": [
                { "name": "Max", "type": "max" },
                { "name": "Min", "type": "min" }
            ] },
            "markLine": { "data": [ { "name": "Average", "type": "average" } ] },
            "data": counts(&aggregate.monthly)
        }]
    })
}

/// Standalone HTML page drawing one ECharts option
pub fn render_chart_page(title: &str, option: &Value, width: &str, height: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{src}"></script>
</head>
<body>
<div id="chart" style="width:{width};height:{height};margin:0 auto;"></div>
<script type="text/javascript">
const chart = echarts.init(document.getElementById("chart"));
chart.setOption({option});
</script>
</body>
</html>
"#,
        title = encode_text(title),
        src = encode_double_quoted_attribute(ECHARTS_SRC),
        width = encode_double_quoted_attribute(width),
        height = encode_double_quoted_attribute(height),
        option = script_json(option),
    )
}

/// Page linking the three chart files
pub fn render_index(repo_label: &str) -> String {
    let heading = format!("GitHub Issues Charts: {}", repo_label);
    let title = encode_text(&heading);
    let link_style = "font-size: 18px; padding: 10px; background-color: #f0f0f0; border-radius: 5px; text-decoration: none; color: #333;";

    let links: String = [
        (STATUS_CHART_FILE, "Status distribution"),
        (LABELS_CHART_FILE, "Label distribution"),
        (TIMELINE_CHART_FILE, "Creation trend"),
    ]
    .iter()
    .map(|(href, text)| {
        format!(
            "    <a href=\"{}\" style=\"{}\">{}</a>\n",
            encode_double_quoted_attribute(href),
            encode_double_quoted_attribute(link_style),
            encode_text(text)
        )
    })
    .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<div style="margin: 20px; text-align: center;">
  <h1>{title}</h1>
  <div style="display: flex; flex-direction: column; gap: 15px; margin-top: 30px;">
{links}  </div>
</div>
</body>
</html>
"#,
        title = title,
        links = links,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{fixtures, IssueState};

    fn aggregate() -> ChartAggregate {
        ChartAggregate::from_issues(&[
            fixtures::issue(1, IssueState::Open, &["bug"], (2024, 1, 5)),
            fixtures::issue(2, IssueState::Closed, &["bug", "ui"], (2024, 1, 20)),
            fixtures::issue(3, IssueState::Open, &[], (2024, 3, 2)),
        ])
    }

    #[test]
    fn test_status_option_data() {
        let option = status_option(&aggregate());
        assert_eq!(option["series"][0]["type"], "pie");
        assert_eq!(option["series"][0]["data"][0], json!({"name": "open", "value": 2}));
        assert_eq!(option["series"][0]["data"][1], json!({"name": "closed", "value": 1}));
        assert_eq!(option["title"]["subtext"], "Total: 3");
    }

    #[test]
    fn test_labels_option_axis() {
        let option = labels_option(&aggregate());
        assert_eq!(option["xAxis"]["data"], json!(["bug", "no label", "ui"]));
        assert_eq!(option["xAxis"]["axisLabel"]["rotate"], 45);
        assert_eq!(option["series"][0]["data"], json!([2, 1, 1]));
    }

    #[test]
    fn test_timeline_option() {
        let option = timeline_option(&aggregate());
        assert_eq!(option["xAxis"]["data"], json!(["2024-01", "2024-02", "2024-03"]));
        assert_eq!(option["series"][0]["data"], json!([2, 0, 1]));
        assert_eq!(option["series"][0]["smooth"], true);
        assert_eq!(option["dataZoom"][1]["type"], "slider");
        assert_eq!(option["title"]["subtext"], "From 2024-01 to 2024-03");
    }

    #[test]
    fn test_chart_page_escapes_script_breakout() {
        let option = json!({"title": {"text": "</script><script>alert(1)</script>"}});
        let page = render_chart_page("a < b", &option, "800px", "600px");
        assert!(page.contains("<title>a &lt; b</title>"));
        assert!(!page.contains("</script><script>alert"));
        assert!(page.contains(ECHARTS_SRC));
    }

    #[test]
    fn test_index_links_all_charts() {
        let index = render_index("octo/repo");
        for file in [STATUS_CHART_FILE, LABELS_CHART_FILE, TIMELINE_CHART_FILE] {
            assert!(index.contains(&format!("href=\"{}\"", file)));
        }
        assert!(index.contains("GitHub Issues Charts: octo/repo"));
    }

    #[test]
    fn test_index_escapes_repository_label() {
        let index = render_index("<b>octo</b>/repo");
        assert!(index.contains("<h1>GitHub Issues Charts: &lt;b&gt;octo&lt;/b&gt;/repo</h1>"));
        assert!(!index.contains("<b>octo</b>"));
    }

    #[test]
    fn test_chart_page_escapes_size_attribute() {
        let page = render_chart_page("t", &json!({}), "800px\"><script>", "600px");
        assert!(!page.contains("width:800px\""));
        assert!(page.contains("width:800px&quot;"));
    }
}
