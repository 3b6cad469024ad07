//! Cart commands.

use tracing::info;
use uuid::Uuid;

use dancemode_client::DancemodeClient;
use dancemode_client::store::Readable;
use dancemode_core::{CartItem, CartItemKind, EventId, PackageId};

pub fn show(client: &DancemodeClient) {
    let cart = client.state().cart().get();
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    info!("Cart ({} items)", client.state().cart_item_count().get());
    for item in cart.items() {
        info!(
            "  {} {} | {} | {}",
            item.kind,
            item.id,
            item.title.as_deref().unwrap_or("-"),
            item.price.display()
        );
    }
    info!("Total: {}", cart.total().display());
}

/// Look up an event and add it to the cart.
///
/// # Errors
///
/// Returns an error if the event cannot be fetched or is sold out.
pub async fn add_event(
    client: &DancemodeClient,
    id: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let event = client.api().get_event(EventId::new(id)).await?;
    if event.is_sold_out() {
        return Err(format!("{} is sold out", event.title).into());
    }
    add(client, CartItem::from(&event));
    Ok(())
}

/// Look up a package and add it to the cart.
///
/// # Errors
///
/// Returns an error if the package cannot be fetched.
pub async fn add_package(
    client: &DancemodeClient,
    id: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let package = client.api().get_package(PackageId::new(id)).await?;
    add(client, CartItem::from(&package));
    Ok(())
}

fn add(client: &DancemodeClient, item: CartItem) {
    if client.cart().contains(item.id, item.kind) {
        info!("Already in cart");
        return;
    }
    let title = item.title.clone().unwrap_or_default();
    client.cart().add_item(item);
    info!(
        "Added {title}, cart total {}",
        client.state().cart_total().get().display()
    );
}

pub fn remove(client: &DancemodeClient, id: Uuid, package: bool) {
    let kind = if package {
        CartItemKind::Package
    } else {
        CartItemKind::Event
    };
    if !client.cart().contains(id, kind) {
        info!("No {kind} {id} in cart");
        return;
    }
    client.cart().remove_item(id, kind);
    info!("Removed {kind} {id}");
}

pub fn clear(client: &DancemodeClient) {
    client.cart().clear_cart();
    info!("Cart cleared");
}

/// # Errors
///
/// Returns an error if the cart is empty, nobody is signed in, or a
/// registration fails.
pub async fn checkout(client: &DancemodeClient) -> Result<(), Box<dyn std::error::Error>> {
    let registrations = client.cart().checkout(client.api()).await?;
    info!("Created {} registration(s)", registrations.len());
    for registration in &registrations {
        info!(
            "  {} | {:?} | payment {:?}",
            registration.id, registration.status, registration.payment_status
        );
    }
    Ok(())
}
