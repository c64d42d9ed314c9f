use crate::model::ReportData;

/// Render a self-contained HTML panel (data embedded as JSON).
///
/// The template is filled with `replace` rather than `format!()` because the
/// embedded JS uses `${x}` template literals.
pub fn render_html_report(data: &ReportData) -> anyhow::Result<String> {
    // "</" inside a string would close the script element early.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Painel Interativo SISDEPEN</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; color: #222; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  header h1 { margin: 0 0 4px 0; font-size: 22px; }
  .container { display: flex; min-height: calc(100vh - 70px); }
  .sidebar { width: 300px; border-right: 1px solid #ddd; padding: 12px; }
  .main { flex: 1; padding: 12px 16px; overflow: auto; }

  .muted { color: #777; font-size: 12px; }
  .pill { padding: 2px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; font-size: 13px; }
  .missing { color: #b00; }

  .cards { display: flex; gap: 16px; flex-wrap: wrap; }
  .card { flex: 1; min-width: 200px; border: 1px solid #ddd; border-radius: 8px; padding: 12px; }
  .card .label { font-size: 13px; color: #555; }
  .card .value { font-size: 28px; font-variant-numeric: tabular-nums; }

  .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(360px, 1fr)); gap: 16px; }
  .chart { border: 1px solid #eee; border-radius: 8px; padding: 12px; }
  .bar-row { display: flex; align-items: center; gap: 8px; margin: 3px 0; font-size: 13px; }
  .bar-label { width: 110px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
  .bar-track { flex: 1; background: #f3f3f3; border-radius: 4px; }
  .bar { height: 16px; background: #4c78a8; border-radius: 4px; }
  .bar-value { width: 90px; text-align: right; font-variant-numeric: tabular-nums; }
  .pie-wrap { display: flex; gap: 16px; align-items: center; }
  .pie { width: 160px; height: 160px; border-radius: 50%; position: relative; }
  .pie::after { content: ""; position: absolute; inset: 28%; background: white; border-radius: 50%; }
  .swatch { display: inline-block; width: 10px; height: 10px; margin-right: 6px; border-radius: 2px; }
  .info { background: #eef6ff; border: 1px solid #cfe3ff; padding: 8px; border-radius: 6px; font-size: 14px; }
  .success { background: #eefaf0; border: 1px solid #cdebd3; padding: 8px; border-radius: 6px; margin-top: 16px; }

  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 4px 8px; text-align: left; font-size: 13px; white-space: nowrap; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 12px; }
</style>
</head>
<body>
<header>
  <h1>Painel Interativo SISDEPEN</h1>
  <div class="muted" id="source"></div>
</header>

<div class="container">
  <div class="sidebar">
    <h3>Colunas detectadas</h3>
    <ul id="mapping"></ul>
    <h3>Filtros</h3>
    <div id="filters"></div>
  </div>

  <div class="main">
    <div class="cards" id="cards"></div>
    <hr>
    <h2>Gráficos</h2>
    <div class="charts">
      <div class="chart" id="chartUf"></div>
      <div class="chart" id="chartRegime"></div>
      <div class="chart" id="chartSex"></div>
    </div>
    <h3>Amostra dos dados filtrados</h3>
    <div style="overflow:auto; max-height: 480px;">
      <table id="sample"></table>
    </div>
    <div class="success">Painel gerado: ajuste os filtros na linha de comando (--uf, --ano) e gere novamente.</div>
  </div>
</div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const PALETTE = ["#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6", "#9d755d", "#bab0ac"];

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function fmtNum(x) {
  return Number(x).toLocaleString("en-US", { maximumFractionDigits: 2 });
}

function renderSidebar() {
  document.getElementById("source").textContent = "Arquivo: " + DATA.source;

  const ul = document.getElementById("mapping");
  ul.innerHTML = DATA.mapping.map(m => m.column === null
    ? `<li>${escapeHtml(m.field)}: <code class="missing">NÃO ENCONTRADA</code></li>`
    : `<li>${escapeHtml(m.field)}: <code>${escapeHtml(m.column)}</code></li>`
  ).join("");

  const f = DATA.filters;
  function select(label, options, selected) {
    const opts = options.map(o =>
      `<option${o === selected ? " selected" : ""}>${escapeHtml(o)}</option>`).join("");
    return `<label>${label}<br><select disabled style="width:100%">${opts}</select></label><br><br>`;
  }
  document.getElementById("filters").innerHTML =
    select("UF", f.uf_options, f.selected_uf) + select("Ano", f.year_options, f.selected_year);
}

function renderCards() {
  const t = DATA.totals;
  const card = (label, value) =>
    `<div class="card"><div class="label">${label}</div><div class="value">${escapeHtml(value)}</div></div>`;
  document.getElementById("cards").innerHTML =
    card("Total de Presos (filtro atual)", t.population) +
    card("Unidades Prisionais (únicas)", String(t.facilities)) +
    card("Último Ano Registrado", t.last_year);
}

function renderBars(id, title, points, emptyNote) {
  const el = document.getElementById(id);
  if (!points.length) {
    el.innerHTML = `<h4>${title}</h4><div class="info">${emptyNote}</div>`;
    return;
  }
  const max = Math.max(...points.map(p => p.value), 0) || 1;
  el.innerHTML = `<h4>${title}</h4>` + points.map(p => `
    <div class="bar-row">
      <span class="bar-label" title="${escapeHtml(p.label)}">${escapeHtml(p.label)}</span>
      <span class="bar-track"><div class="bar" style="width:${(100 * Math.max(p.value, 0) / max).toFixed(1)}%"></div></span>
      <span class="bar-value">${fmtNum(p.value)}</span>
    </div>`).join("");
}

function renderPie(id, title, points, emptyNote) {
  const el = document.getElementById(id);
  const total = points.reduce((acc, p) => acc + p.value, 0);
  if (!points.length || total <= 0) {
    el.innerHTML = `<h4>${title}</h4><div class="info">${emptyNote}</div>`;
    return;
  }
  let acc = 0;
  const stops = points.map((p, i) => {
    const from = 100 * acc / total;
    acc += p.value;
    const to = 100 * acc / total;
    return `${PALETTE[i % PALETTE.length]} ${from.toFixed(2)}% ${to.toFixed(2)}%`;
  }).join(", ");
  const legend = points.map((p, i) => `
    <div><span class="swatch" style="background:${PALETTE[i % PALETTE.length]}"></span>
    ${escapeHtml(p.label)}: ${fmtNum(p.value)} (${(100 * p.value / total).toFixed(1)}%)</div>`).join("");
  el.innerHTML = `<h4>${title}</h4>
    <div class="pie-wrap"><div class="pie" style="background: conic-gradient(${stops})"></div><div>${legend}</div></div>`;
}

function renderSample() {
  const s = DATA.sample;
  const head = "<thead><tr>" + s.headers.map(h => `<th>${escapeHtml(h)}</th>`).join("") + "</tr></thead>";
  const body = "<tbody>" + s.rows.map(r =>
    "<tr>" + r.map(v => `<td>${escapeHtml(v)}</td>`).join("") + "</tr>").join("") + "</tbody>";
  document.getElementById("sample").innerHTML = head + body;
}

renderSidebar();
renderCards();
renderBars("chartUf", "População Carcerária por UF", DATA.charts.population_by_uf,
  "Coluna UF não encontrada ou sem dados suficientes para o gráfico por UF.");
renderPie("chartRegime", "Distribuição por Regime", DATA.charts.regime,
  "Coluna Regime não encontrada ou sem dados suficientes.");
renderBars("chartSex", "Distribuição por Sexo", DATA.charts.sex,
  "Coluna Sexo não encontrada ou sem dados suficientes.");
renderSample();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view::Filter;
    use crate::model::{Dataset, build_report_data, normalize};
    use crate::schema::ColumnMapping;
    use crate::table::{Cell, RawTable};

    #[test]
    fn embeds_report_json() {
        let raw = RawTable::from_rows(
            vec!["UF".into(), "Unidade".into()],
            vec![vec![
                Cell::Text("SP".into()),
                Cell::Text("</script><b>x</b>".into()),
            ]],
        );
        let mapping = ColumnMapping::build(&raw.column_names());
        let ds = Dataset {
            table: normalize(raw, &mapping),
            mapping,
        };
        let data = build_report_data("dados.csv", &ds, &Filter::default(), 200).unwrap();
        let html = render_html_report(&data).unwrap();

        assert!(!html.contains("__DATA__"));
        assert!(html.contains(r#""source":"dados.csv""#));
        assert!(html.contains(r#""selected_uf":"Todos""#));
        // Only the template's own closing tag survives.
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn renders_complete_document() {
        let raw = RawTable::from_rows(
            vec!["UF".into(), "Regime".into()],
            vec![vec![Cell::Text("BA".into()), Cell::Text("Fechado".into())]],
        );
        let mapping = ColumnMapping::build(&raw.column_names());
        let ds = Dataset {
            table: normalize(raw, &mapping),
            mapping,
        };
        let data = build_report_data("dados.csv", &ds, &Filter::default(), 200).unwrap();
        let html = render_html_report(&data).unwrap();

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains(r##""#4c78a8""##));
        assert!(html.contains(r##""#bab0ac"];"##));
        assert!(html.contains("renderPie(\"chartRegime\""));
    }
}
