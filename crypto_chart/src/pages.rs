//! Server-rendered HTML for the three pages of the web UI.

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 960px; margin: 2rem auto; }}
label {{ display: block; margin-top: 0.75rem; }}
.error {{ color: #b00020; }}
img {{ max-width: 100%; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// The submission form. `Load symbols` fills the asset suggestions from `/assets`.
pub fn index_page(default_asset: &str) -> String {
    let default_asset = escape(default_asset);
    let body = format!(
        r#"<h1>Crypto price chart</h1>
<form method="post" action="/">
<label>API key <input type="text" name="api_key" id="api_key" required></label>
<label>API secret <input type="password" name="api_secret" id="api_secret" required></label>
<label>Start date <input type="date" name="start_date" required></label>
<label>End date <input type="date" name="end_date" required></label>
<label>Asset <input type="text" name="asset" list="symbols" placeholder="{default_asset}"></label>
<datalist id="symbols"></datalist>
<p>
<button type="button" id="load_symbols">Load symbols</button>
<button type="submit">Fetch and plot</button>
</p>
<p class="error" id="symbols_error"></p>
</form>
<script>
document.getElementById("load_symbols").addEventListener("click", async () => {{
  const params = new URLSearchParams({{
    api_key: document.getElementById("api_key").value,
    api_secret: document.getElementById("api_secret").value,
  }});
  const errorBox = document.getElementById("symbols_error");
  errorBox.textContent = "";
  const response = await fetch("/assets?" + params.toString());
  const payload = await response.json();
  if (!response.ok) {{
    errorBox.textContent = payload.error;
    return;
  }}
  const list = document.getElementById("symbols");
  list.replaceChildren(...payload.symbols.map((symbol) => {{
    const option = document.createElement("option");
    option.value = symbol;
    return option;
  }}));
}});
</script>"#
    );
    layout("Crypto price chart", &body)
}

/// Outcome message of a submission that did not reach the chart.
pub fn result_page(message: &str) -> String {
    let body = format!(
        r#"<h1>Result</h1>
<p class="error">{}</p>
<p><a href="/">Back</a></p>"#,
        escape(message)
    );
    layout("Result", &body)
}

pub fn plot_page(asset: &str, image_url: &str) -> String {
    let escaped = escape(asset);
    let body = format!(
        r#"<h1>{escaped} Price Evolution</h1>
<img src="{}" alt="{escaped} closing prices">
<p><a href="/">Back</a></p>"#,
        escape(image_url)
    );
    layout(&format!("{asset} chart"), &body)
}
