use storefront_app::context::AppContext;

use super::describe;

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let total = context.cart.view().formatted_total();

    let orders = context
        .checkout
        .checkout()
        .await
        .map_err(|error| format!("checkout failed: {}", describe(&error)))?;

    println!("{}", placed(orders.len(), &total));

    for order in orders {
        println!("order_id: {order}");
    }

    Ok(())
}

fn placed(count: usize, total: &str) -> String {
    let noun = if count == 1 { "order" } else { "orders" };

    format!("placed {count} {noun} totalling {total}")
}
