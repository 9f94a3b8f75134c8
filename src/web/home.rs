use axum::response::Html;
use maud::html;

use crate::web::layout;

pub async fn index() -> Html<String> {
    layout::render(
        "Home",
        html! {
            div class="text-center" {
                h1 class="display-4" { "Welcome" }
                p { "Manage the store catalogue and customer orders." }
                ul class="menu" {
                    li { a class="btn" href="/Categories" { "Categories" } }
                    li { a class="btn" href="/Products" { "Products" } }
                    li { a class="btn" href="/Orders" { "Orders" } }
                }
            }
        },
    )
}
