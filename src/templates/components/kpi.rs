use maud::{html, Markup};

pub fn kpi_card(titulo: &str, valor: &str) -> Markup {
    html! {
        div class="kpi-card" {
            div class="kpi-title" { (titulo) }
            div class="kpi-value" { (valor) }
        }
    }
}
