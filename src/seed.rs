//! Starter plant library.

use crate::models::{Category, NewPlant};

fn sample(
    name: &str,
    category: Category,
    days_to_sprout: u32,
    days_to_harvest: u32,
    season: &str,
    description: &str,
) -> NewPlant {
    NewPlant {
        name: name.to_string(),
        category,
        days_to_sprout,
        days_to_harvest,
        season: season.to_string(),
        description: Some(description.to_string()),
        image_url: None,
    }
}

pub fn sample_plants() -> Vec<NewPlant> {
    vec![
        sample(
            "Tomate - Cherry",
            Category::Vegetable,
            10,
            75,
            "Primavera/Verano",
            "Tomates pequeños y dulces, muy productivos y fáciles de cultivar.",
        ),
        sample(
            "Lechuga - Romana",
            Category::Vegetable,
            8,
            60,
            "Primavera/Otoño",
            "Cogollos altos y crujientes, ideales para ensaladas.",
        ),
        sample(
            "Albahaca - Genovesa",
            Category::Herb,
            7,
            75,
            "Verano",
            "Albahaca clásica de aroma intenso, perfecta para pesto.",
        ),
        sample(
            "Rábano - Cherry Belle",
            Category::Vegetable,
            5,
            30,
            "Primavera/Otoño",
            "Crecimiento rápido y sabor suave, listo en unos 30 días.",
        ),
        sample(
            "Espinaca - Baby",
            Category::Vegetable,
            6,
            45,
            "Primavera/Otoño",
            "Hojas tiernas que resisten el frío y crecen rápido.",
        ),
        sample(
            "Zanahoria - Nantesa",
            Category::Vegetable,
            12,
            70,
            "Primavera/Otoño",
            "Zanahorias dulces y crujientes, buenas para guardar.",
        ),
    ]
}
