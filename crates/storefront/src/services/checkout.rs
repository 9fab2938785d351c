//! Checkout hand-off to WhatsApp.
//!
//! There is no payment processing and no server-side order record: checkout
//! builds a pre-filled order message from the cart and a `wa.me` deep link
//! addressed to the store's support number. The human on the other end
//! verifies the payment receipt the customer attaches.

use url::Url;

use bodega_core::Cart;

/// Build the pre-filled order message for a cart.
///
/// One line per cart line (name, quantity, USD line total), then the USD
/// total and a note that the payment receipt follows.
#[must_use]
pub fn order_message(cart: &Cart) -> String {
    let mut lines = vec!["Hola! Quiero confirmar mi pedido:".to_string()];

    for line in cart.lines() {
        lines.push(format!(
            "- {} x{} (${:.2})",
            line.item.name(),
            line.quantity,
            line.line_total_usd()
        ));
    }

    lines.push(format!("Total: ${:.2}", cart.subtotal()));
    lines.push("Adjunto el comprobante de pago.".to_string());
    lines.join("\n")
}

/// Build the `wa.me` deep link carrying the order message.
///
/// # Errors
///
/// Returns an error if the support number does not form a valid URL; the
/// number is validated at configuration load, so this is unexpected.
pub fn checkout_url(cart: &Cart, support_number: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://wa.me/{support_number}"))?;
    url.query_pairs_mut()
        .append_pair("text", &order_message(cart));
    Ok(url)
}
