// src/services/message_template.rs

use crate::models::{
    pix::{format_amount, PixCharge},
    reseller::Reseller,
};

pub const DEFAULT_TEMPLATE: &str = "*Cobrança PIX Gerada*\n\nOlá {nome},\n\nSua cobrança PIX foi gerada com sucesso!\n\nValor: R$ {valor}\nID da Transação: {id}\nTXID: {txid}\n\nCódigo PIX Copia e Cola:\n{codigopix}\n\nPor favor, efetue o pagamento utilizando o QR Code enviado ou o código acima.\n\nAtenciosamente,\nPrime Stream";

const MISSING_PAYMENT_CODE: &str = "Não disponível";

/// Troca os marcadores {nome}, {sobrenome}, {valor}, {id}, {txid} e {codigopix}.
/// Substituição literal, sem escape. Sem txid, o marcador fica como está.
pub fn render(template: &str, reseller: &Reseller, charge: &PixCharge) -> String {
    let mut message = template
        .replace("{nome}", &reseller.first_name)
        .replace("{sobrenome}", &reseller.last_name)
        .replace("{valor}", &format_amount(charge.amount))
        .replace("{id}", &charge.id);

    if let Some(txid) = charge.txid.as_deref().filter(|t| !t.is_empty()) {
        message = message.replace("{txid}", txid);
    }

    let payment_code = charge
        .payment_code
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(MISSING_PAYMENT_CODE);
    message.replace("{codigopix}", payment_code)
}

pub fn template_or_default(template: Option<&str>) -> &str {
    template
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pix::ChargeStatus;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn reseller() -> Reseller {
        Reseller {
            id: "r1".into(),
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            cpf: "12345678901".into(),
            whatsapp: "11999999999".into(),
            username: "ana.s".into(),
            client_count: 5,
            created_at: None,
        }
    }

    fn charge(txid: Option<&str>, code: Option<&str>) -> PixCharge {
        PixCharge {
            id: "TX-1001".into(),
            txid: txid.map(Into::into),
            amount: Decimal::from_str("49.9").unwrap(),
            cpf: "12345678901".into(),
            payer_name: "Ana Silva".into(),
            status: ChargeStatus::Ativa,
            created_at: None,
            payment_code: code.map(Into::into),
            qr_code: None,
            detailed_status: None,
        }
    }

    #[test]
    fn renders_amount_with_two_decimals() {
        let text = render("{nome} deve R${valor}", &reseller(), &charge(None, None));
        assert_eq!(text, "Ana deve R$49.90");
    }

    #[test]
    fn missing_txid_stays_verbatim_and_code_has_fallback() {
        let text = render("{id} {txid} {codigopix}", &reseller(), &charge(None, None));
        assert_eq!(text, "TX-1001 {txid} Não disponível");

        let text = render("{txid} {codigopix}", &reseller(), &charge(Some("abc"), Some("0002")));
        assert_eq!(text, "abc 0002");
    }

    #[test]
    fn rendering_a_resolved_message_is_idempotent() {
        let r = reseller();
        let c = charge(Some("abc"), Some("0002"));
        let once = render(DEFAULT_TEMPLATE, &r, &c);
        assert_eq!(render(&once, &r, &c), once);
        assert!(once.contains("Olá Ana,"));
        assert!(once.contains("Valor: R$ 49.90"));
    }

    #[test]
    fn blank_template_falls_back_to_default() {
        assert_eq!(template_or_default(Some("  ")), DEFAULT_TEMPLATE);
        assert_eq!(template_or_default(Some("Oi {nome}")), "Oi {nome}");
        assert_eq!(template_or_default(None), DEFAULT_TEMPLATE);
    }
}
