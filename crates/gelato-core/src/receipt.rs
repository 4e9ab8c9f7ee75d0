//! # Receipt Rendering
//!
//! Renders a completed order as a self-contained HTML document sized for an
//! 80 mm thermal printer. Sending it to a printer is the app's job.

use std::fmt::Write as _;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Order, SaleItem};

/// Shop details printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptHeader {
    pub store_name: String,
    #[serde(default)]
    pub address_lines: Vec<String>,
    pub currency_symbol: String,
    /// Local offset used for the printed date.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for ReceiptHeader {
    fn default() -> Self {
        ReceiptHeader {
            store_name: "Gelato".to_string(),
            address_lines: Vec::new(),
            currency_symbol: "R$".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl ReceiptHeader {
    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// Escapes text for inclusion in HTML element content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Renders the printable receipt for `order`.
///
/// Works for open orders too (a "conferência" slip); payment lines are only
/// printed when present.
pub fn render_receipt_html(order: &Order, header: &ReceiptHeader) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Comprovante {}</title>", escape_html(short_id(&order.id)));
    html.push_str(
        "<style>body{font-family:monospace;width:72mm;margin:0 auto;font-size:12px}\
         h1{font-size:16px;text-align:center;margin:4px 0}\
         .center{text-align:center}.row{display:flex;justify-content:space-between}\
         .opt{padding-left:8px;font-size:11px}hr{border:0;border-top:1px dashed #000}\
         .total{font-weight:bold;font-size:14px}</style>\n</head>\n<body>\n",
    );

    // Header
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&header.store_name));
    for line in &header.address_lines {
        let _ = writeln!(html, "<div class=\"center\">{}</div>", escape_html(line));
    }
    html.push_str("<hr>\n");

    let offset = FixedOffset::east_opt(header.utc_offset_minutes.saturating_mul(60));
    let printed_at = match offset {
        Some(offset) => order.effective_timestamp().with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string(),
        None => order.effective_timestamp().format("%d/%m/%Y %H:%M").to_string(),
    };
    let _ = writeln!(html, "<div>Pedido: {}</div>", escape_html(short_id(&order.id)));
    let _ = writeln!(html, "<div>Cliente: {}</div>", escape_html(&order.customer_name));
    let _ = writeln!(html, "<div>Data: {}</div>", printed_at);
    html.push_str("<hr>\n");

    // Items
    for item in &order.items {
        render_item(&mut html, item, header);
    }
    html.push_str("<hr>\n");

    // Totals
    let _ = writeln!(
        html,
        "<div class=\"row total\"><span>TOTAL</span><span>{}</span></div>",
        header.money(order.recorded_total())
    );
    if let Some(method) = order.payment_method {
        let _ = writeln!(
            html,
            "<div class=\"row\"><span>Pagamento</span><span>{}</span></div>",
            method.label()
        );
    }
    if let Some(tendered) = order.amount_tendered {
        let _ = writeln!(
            html,
            "<div class=\"row\"><span>Valor recebido</span><span>{}</span></div>",
            header.money(tendered)
        );
    }
    if let Some(change) = order.change {
        let _ = writeln!(
            html,
            "<div class=\"row\"><span>Troco</span><span>{}</span></div>",
            header.money(change)
        );
    }

    html.push_str("<hr>\n<div class=\"center\">Obrigado e volte sempre!</div>\n</body>\n</html>\n");
    html
}

fn render_item(html: &mut String, item: &SaleItem, header: &ReceiptHeader) {
    let label = match item.weight_grams {
        Some(grams) if item.product.is_weighed() => {
            format!("{} ({} g)", escape_html(&item.product.name), grams)
        }
        _ => format!("{}x {}", item.effective_quantity(), escape_html(&item.product.name)),
    };
    let _ = writeln!(
        html,
        "<div class=\"row\"><span>{}</span><span>{}</span></div>",
        label,
        header.money(item.total())
    );

    for (group, choices) in &item.options {
        if choices.is_empty() {
            continue;
        }
        let choices: Vec<String> = choices.iter().map(|c| escape_html(c)).collect();
        let _ = writeln!(
            html,
            "<div class=\"opt\">{}: {}</div>",
            escape_html(group),
            choices.join(", ")
        );
    }
    for addon in &item.addons {
        let _ = writeln!(
            html,
            "<div class=\"opt\">+ {} {}</div>",
            escape_html(&addon.name),
            header.money(addon.price)
        );
    }
}

/// First block of the UUID, enough to match a receipt to an order.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{finalize_order, Payment};
    use crate::types::{OptionLimits, Product, ProductKind, FRUITS_GROUP};
    use chrono::{TimeZone, Utc};

    fn completed_order() -> Order {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 17, 5, 0).unwrap();
        let cup = Product::new(
            11,
            "Açaí 500ml",
            Money::from_cents(2200),
            "Açaí",
            ProductKind::Selectable {
                limits: OptionLimits::new(2, 1, 3),
            },
        );
        let kilo = Product::new(4, "Sorvete self-service", Money::from_cents(4700), "Sorvetes", ProductKind::Weight);
        let syrup = Product::new(20, "Calda de chocolate", Money::from_cents(300), "Adicionais", ProductKind::Addon);

        let mut cup_line = SaleItem::unit(cup, 1);
        cup_line
            .options
            .insert(FRUITS_GROUP.to_string(), vec!["morango".into(), "banana".into()]);
        cup_line.addons.push(syrup);

        let mut order = Order::open_comanda("Ana <Mesa 2>", now).unwrap();
        order.items = vec![cup_line, SaleItem::weighed(kilo, 500)];
        finalize_order(&mut order, &Payment::cash(Money::from_cents(5000)), now).unwrap();
        order
    }

    #[test]
    fn test_receipt_contains_order_details() {
        let header = ReceiptHeader {
            store_name: "Gelato & Cia".to_string(),
            address_lines: vec!["Rua das Flores, 10".to_string()],
            currency_symbol: "R$".to_string(),
            utc_offset_minutes: -180,
        };
        let html = render_receipt_html(&completed_order(), &header);

        assert!(html.contains("Gelato &amp; Cia"));
        assert!(html.contains("Rua das Flores, 10"));
        assert!(html.contains("Ana &lt;Mesa 2&gt;"));
        assert!(html.contains("1x Açaí 500ml"));
        assert!(html.contains("frutas: morango, banana"));
        assert!(html.contains("+ Calda de chocolate R$ 3,00"));
        assert!(html.contains("Sorvete self-service (500 g)"));
        // 22.00 + 3.00 + 23.50
        assert!(html.contains("R$ 48,50"));
        assert!(html.contains("Dinheiro"));
        assert!(html.contains("R$ 50,00"));
        assert!(html.contains("R$ 1,50"));
        assert!(html.contains("15/01/2024 14:05"));
    }

    #[test]
    fn test_open_order_has_no_payment_lines() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 17, 5, 0).unwrap();
        let order = Order::open_comanda("Bia", now).unwrap();
        let html = render_receipt_html(&order, &ReceiptHeader::default());
        assert!(!html.contains("Pagamento"));
        assert!(!html.contains("Troco"));
        assert!(html.contains("R$ 0,00"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("3f2a9c1e-aaaa-bbbb"), "3f2a9c1e");
        assert_eq!(short_id("plain"), "plain");
    }
}
