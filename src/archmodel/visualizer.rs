/// Turns generated representations into self-contained HTML pages. Graph
/// layout is handed to the viz-js CDN build in the browser.
pub struct ModelVisualizer;

const PAGE_STYLE: &str = r#"
        body { margin: 0; padding: 20px; font-family: Arial, sans-serif; }
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { text-align: center; color: #333; }
        .visualization { width: 100%; }
        pre { background-color: #f5f5f5; padding: 16px; border-radius: 8px; overflow-x: auto; }
"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl ModelVisualizer {
    /// Render a DOT class diagram into an interactive page.
    pub fn visualize_uml(uml_dot: &str) -> String {
        // The DOT source travels as a JS string literal.
        let encoded = serde_json::to_string(uml_dot).unwrap_or_else(|_| "\"\"".to_string());
        format!(
            r#"<div id="graph"></div>
<script src="https://cdn.jsdelivr.net/npm/@viz-js/viz@3/lib/viz-standalone.js"></script>
<script>
    Viz.instance().then(function(viz) {{
        document.getElementById("graph").appendChild(viz.renderSVGElement({encoded}));
    }});
</script>
<pre>{dot}</pre>"#,
            encoded = encoded,
            dot = escape_html(uml_dot),
        )
    }

    /// Render the 4+1 views as a sectioned dashboard.
    pub fn visualize_4plus1(views: &serde_json::Value) -> String {
        let mut sections = String::new();
        if let Some(object) = views.as_object() {
            for (view_name, view_data) in object {
                let pretty = serde_json::to_string_pretty(view_data)
                    .unwrap_or_else(|_| view_data.to_string());
                sections.push_str(&format!(
                    "<h2>{}</h2>\n<pre>{}</pre>\n",
                    escape_html(view_name),
                    escape_html(&pretty)
                ));
            }
        }
        sections
    }

    /// Render the ADL text as a preformatted block.
    pub fn visualize_adl(adl_text: &str) -> String {
        format!("<pre>{}</pre>", escape_html(adl_text))
    }

    /// Wrap a rendered fragment in a complete page.
    pub fn page(title: &str, fragment: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="visualization">
            {fragment}
        </div>
    </div>
</body>
</html>"#,
            title = escape_html(title),
            style = PAGE_STYLE,
            fragment = fragment,
        )
    }

    /// Confirmation page shown after an upload, linking to the rendering.
    pub fn upload_ready_page(model_type: &str, code_hash: &str) -> String {
        let link = format!("/visualize/{}?code_hash={}", model_type, code_hash);
        let fragment = format!(
            r#"<p>Your code has been successfully uploaded and processed.</p>
            <p><a href="{}">View Visualization</a></p>"#,
            link
        );
        Self::page("Visualization Ready", &fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uml_page_embeds_the_dot_source() {
        let html = ModelVisualizer::visualize_uml("digraph { A -> B }");
        assert!(html.contains("viz-standalone.js"));
        assert!(html.contains("digraph { A -&gt; B }"));
    }

    #[test]
    fn html_in_source_text_is_escaped() {
        let html = ModelVisualizer::visualize_adl("<script>alert(1)</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn upload_page_links_to_the_visualization() {
        let html = ModelVisualizer::upload_ready_page("uml", "abcd1234");
        assert!(html.contains("/visualize/uml?code_hash=abcd1234"));
    }
}
