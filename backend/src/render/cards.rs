//! HTML card grid: one card per employee with the main counts and a
//! coloured attendance badge.

use std::fmt::Write as _;

use super::view::{clamp_columns, format_percent, CardView, Page};

const STYLE: &str = r#"<style>
.rt-dashboard { font-family: "Inter", "Segoe UI", Roboto, Arial, sans-serif; font-size: 10pt; color: #222; }
.rt-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px; }
.cards-grid { display: grid; gap: 10px; align-items: start; }
.card { border-radius: 8px; padding: 10px; box-shadow: 0 1px 3px rgba(0,0,0,0.12); background: linear-gradient(180deg, #ffffff 0%, #f7f9fc 100%); border: 1px solid #e6eef6; }
.card .nome { font-weight: 700; margin-bottom: 6px; color: #0b3d91; }
.card .meta { display: flex; justify-content: space-between; margin: 4px 0; }
.meta .label { font-size: 9pt; color: #555; }
.meta .value { font-weight: 700; }
.badge { padding: 4px 8px; border-radius: 12px; font-size: 9pt; color: white; display: inline-block; margin-top: 8px; }
.badge.green { background: #2ecc71; }
.badge.yellow { background: #f1c40f; color: #222; }
.badge.red { background: #e74c3c; }
.small { font-size: 9pt; color: #666; }
</style>"#;

/// Card grid renderer.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    /// Grid columns, clamped to the supported range on render
    pub columns: usize,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self { columns: 3 }
    }
}

impl CardRenderer {
    pub fn new(columns: usize) -> Self {
        Self { columns }
    }

    /// Render one page of cards as a standalone HTML fragment.
    pub fn render(&self, page: &Page<'_, CardView>) -> String {
        let columns = clamp_columns(self.columns);
        let mut html = String::with_capacity(1024 + page.items.len() * 512);

        html.push_str(STYLE);
        html.push_str("\n<div class=\"rt-dashboard\">\n");
        let _ = write!(
            html,
            "  <div class=\"rt-header\"><div><strong>Relatório resumido</strong></div>\
             <div class=\"small\">Colunas: {} · Registros: {} · Página {}/{}</div></div>\n",
            columns, page.total_items, page.number, page.total_pages
        );
        let _ = writeln!(
            html,
            "  <div class=\"cards-grid\" style=\"grid-template-columns: repeat({}, 1fr);\">",
            columns
        );

        for card in page.items {
            render_card(&mut html, card);
        }

        html.push_str("  </div>\n</div>\n");
        html
    }
}

fn render_card(html: &mut String, card: &CardView) {
    let _ = writeln!(html, "    <div class=\"card\">");
    let _ = writeln!(html, "      <div class=\"nome\">{}</div>", html_escape(&card.name));
    for (label, value) in [
        ("Presentes", card.present),
        ("Faltas", card.absent),
        ("Atestados", card.medical_certificate),
        ("Banco de Horas", card.time_bank),
    ] {
        let _ = writeln!(
            html,
            "      <div class=\"meta\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            label, value
        );
    }
    let _ = writeln!(
        html,
        "      <span class=\"badge {}\">Presença: {}</span>",
        card.band.css_class(),
        format_percent(card.percent)
    );
    let _ = writeln!(html, "    </div>");
}

/// HTML-escape a string
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
