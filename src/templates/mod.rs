use anyhow::Result;

/// Values interpolated into the credential email bodies.
///
/// Card fields stay `None` when the account has no active card; the templates
/// then omit the card section entirely.
#[derive(Debug, Clone, Default)]
pub struct CredentialsContext {
    pub user_name: String,
    pub iban: String,
    pub pin: String,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub expiry_month: Option<i64>,
    pub expiry_year: Option<i64>,
    pub cvv_real: Option<String>,
}

/// Seam for the template engine producing the credential email bodies.
pub trait TemplateRenderer: Send + Sync {
    fn render_text(&self, ctx: &CredentialsContext) -> Result<String>;
    fn render_html(&self, ctx: &CredentialsContext) -> Result<String>;
}

/// Built-in renderer for the FinHub credential templates.
pub struct DefaultTemplateRenderer;

impl DefaultTemplateRenderer {
    fn card_lines(ctx: &CredentialsContext) -> Option<(String, String, String)> {
        let brand = ctx.card_brand.as_deref()?;
        let last4 = ctx.card_last4.as_deref()?;
        let expiry = match (ctx.expiry_month, ctx.expiry_year) {
            (Some(m), Some(y)) => format!("{:02}/{}", m, y),
            _ => String::new(),
        };
        Some((brand.to_string(), last4.to_string(), expiry))
    }
}

impl TemplateRenderer for DefaultTemplateRenderer {
    fn render_text(&self, ctx: &CredentialsContext) -> Result<String> {
        let mut body = format!(
            "Gentile {},\n\n\
             il tuo conto FinHub è stato attivato. Di seguito le tue credenziali:\n\n\
             IBAN: {}\n\
             PIN: {}\n",
            ctx.user_name, ctx.iban, ctx.pin
        );

        if let Some((brand, last4, expiry)) = Self::card_lines(ctx) {
            body.push_str(&format!(
                "\nCarta {} terminante in {}\nScadenza: {}\n",
                brand, last4, expiry
            ));
            if let Some(cvv) = ctx.cvv_real.as_deref() {
                body.push_str(&format!("CVV: {}\n", cvv));
            }
        }

        body.push_str(
            "\nConserva queste informazioni in un luogo sicuro e non condividerle con nessuno.\n\n\
             Il team FinHub\n",
        );
        Ok(body)
    }

    fn render_html(&self, ctx: &CredentialsContext) -> Result<String> {
        let mut rows = format!(
            "<tr><td>IBAN</td><td>{}</td></tr>\n\
             <tr><td>PIN</td><td>{}</td></tr>\n",
            ctx.iban, ctx.pin
        );

        if let Some((brand, last4, expiry)) = Self::card_lines(ctx) {
            rows.push_str(&format!(
                "<tr><td>Carta</td><td>{} •••• {}</td></tr>\n\
                 <tr><td>Scadenza</td><td>{}</td></tr>\n",
                brand, last4, expiry
            ));
            if let Some(cvv) = ctx.cvv_real.as_deref() {
                rows.push_str(&format!("<tr><td>CVV</td><td>{}</td></tr>\n", cvv));
            }
        }

        Ok(format!(
            "<html><body>\n\
             <p>Gentile {},</p>\n\
             <p>il tuo conto FinHub è stato attivato. Di seguito le tue credenziali:</p>\n\
             <table>\n{}</table>\n\
             <p>Conserva queste informazioni in un luogo sicuro e non condividerle con nessuno.</p>\n\
             <p>Il team FinHub</p>\n\
             </body></html>\n",
            ctx.user_name, rows
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_without_card() -> CredentialsContext {
        CredentialsContext {
            user_name: "Mario Rossi".to_string(),
            iban: "IT60X0542811101000000123456".to_string(),
            pin: "123456".to_string(),
            ..Default::default()
        }
    }

    fn context_with_card() -> CredentialsContext {
        CredentialsContext {
            card_brand: Some("VISA".to_string()),
            card_last4: Some("1111".to_string()),
            expiry_month: Some(4),
            expiry_year: Some(2028),
            cvv_real: Some("123".to_string()),
            ..context_without_card()
        }
    }

    #[test]
    fn test_text_contains_account_credentials() {
        let body = DefaultTemplateRenderer
            .render_text(&context_without_card())
            .unwrap();
        assert!(body.contains("Mario Rossi"));
        assert!(body.contains("IT60X0542811101000000123456"));
        assert!(body.contains("PIN: 123456"));
    }

    #[test]
    fn test_text_omits_card_section_without_card() {
        let body = DefaultTemplateRenderer
            .render_text(&context_without_card())
            .unwrap();
        assert!(!body.contains("Carta"));
        assert!(!body.contains("CVV"));
    }

    #[test]
    fn test_text_includes_card_details() {
        let body = DefaultTemplateRenderer
            .render_text(&context_with_card())
            .unwrap();
        assert!(body.contains("Carta VISA terminante in 1111"));
        assert!(body.contains("Scadenza: 04/2028"));
        assert!(body.contains("CVV: 123"));
    }

    #[test]
    fn test_card_without_cvv_omits_cvv_line() {
        let ctx = CredentialsContext {
            cvv_real: None,
            ..context_with_card()
        };
        let body = DefaultTemplateRenderer.render_text(&ctx).unwrap();
        assert!(body.contains("Carta VISA"));
        assert!(!body.contains("CVV"));
    }

    #[test]
    fn test_html_renders_card_table() {
        let html = DefaultTemplateRenderer
            .render_html(&context_with_card())
            .unwrap();
        assert!(html.contains("<td>IBAN</td>"));
        assert!(html.contains("VISA •••• 1111"));
        assert!(html.contains("<td>CVV</td><td>123</td>"));
    }
}
