//! Table output

use std::{
    io::{self, Write},
    ops::Range,
};

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use teakworld::{
    blocks::{ContentBlock, Page},
    cart::CartItem,
    catalog::Product,
    checkout::{OrderSnapshot, OrderSummary},
    money::format_minor,
};

/// Write the product list.
pub(crate) fn write_products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Price", "Discount", "Now", "Colours"]);

    for product in products {
        let discount = if product.is_discounted() {
            format!("{}%", product.percentage_discount)
        } else {
            String::new()
        };

        builder.push_record([
            product.document_id.clone(),
            product.title.clone(),
            format_minor(product.price_minor()),
            discount,
            format_minor(product.discounted_price()),
            product.colours.join(", "),
        ]);
    }

    write_table(out, builder, 2..5)
}

/// Write a page title followed by each of its blocks.
pub(crate) fn write_page(out: &mut impl Write, page: &Page) -> io::Result<()> {
    writeln!(out, "{}", page.title)?;

    for block in &page.blocks {
        writeln!(out)?;
        write_block(out, block)?;
    }

    Ok(())
}

fn write_block(out: &mut impl Write, block: &ContentBlock) -> io::Result<()> {
    match block {
        ContentBlock::HeroBanner {
            text, subtitle, cta, ..
        } => {
            writeln!(out, "# {text}")?;

            if let Some(subtitle) = subtitle {
                writeln!(out, "{subtitle}")?;
            }

            writeln!(out, "[{}] {}", cta.text, cta.href)
        }
        ContentBlock::Brands { title, brands } => {
            let names: Vec<&str> = brands.iter().map(|brand| brand.name.as_str()).collect();

            writeln!(out, "{title}: {}", names.join(", "))
        }
        ContentBlock::ProductsGrid {
            title,
            subtitle,
            products,
        } => {
            writeln!(out, "{subtitle}: {title}")?;
            write_products(out, products)
        }
        ContentBlock::About {
            title,
            subtitle,
            content,
            stats,
            ..
        } => {
            writeln!(out, "{subtitle}: {title}")?;

            if let Some(summary) = content.summary() {
                writeln!(out, "{summary}")?;
            }

            for stat in stats {
                writeln!(out, "  {} {}", stat.value, stat.label)?;
            }

            Ok(())
        }
        ContentBlock::Contact {
            title,
            subtitle,
            button_text,
        } => {
            writeln!(out, "{title}")?;

            if let Some(subtitle) = subtitle {
                writeln!(out, "{subtitle}")?;
            }

            writeln!(out, "[{button_text}]")
        }
    }
}

/// Write cart lines followed by the order summary.
pub(crate) fn write_cart(
    out: &mut impl Write,
    items: &[CartItem],
    summary: &OrderSummary,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    write_lines(out, items)?;
    write_summary(out, summary)
}

/// Write subtotal, shipping, tax and total.
pub(crate) fn write_summary(out: &mut impl Write, summary: &OrderSummary) -> io::Result<()> {
    let shipping = if summary.ships_free() {
        "Free".to_string()
    } else {
        format_minor(summary.shipping())
    };

    let rows = [
        ("Subtotal", format_minor(summary.subtotal())),
        ("Shipping", shipping),
        ("Tax", format_minor(summary.tax())),
        ("Total", format_minor(summary.total())),
    ];

    for (label, value) in rows {
        writeln!(out, " {label:<10}{value:>16}")?;
    }

    if !summary.ships_free() {
        writeln!(
            out,
            " Add {} more for free shipping ({}%)",
            format_minor(summary.amount_until_free_shipping()),
            summary.free_shipping_progress()
        )?;
    }

    Ok(())
}

/// Write the confirmation for a placed order.
pub(crate) fn write_confirmation(out: &mut impl Write, snapshot: &OrderSnapshot) -> io::Result<()> {
    let confirmation = snapshot.confirmation();

    writeln!(
        out,
        "{} (order {}, {} units)",
        confirmation.message,
        confirmation.document_id,
        snapshot.unit_count()
    )?;

    write_lines(out, snapshot.items())?;
    write_summary(out, snapshot.summary())
}

fn write_lines(out: &mut impl Write, items: &[CartItem]) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Cart ID", "Item", "Variant", "Qty", "Price", "Total"]);

    for item in items {
        builder.push_record([
            item.key().to_string(),
            item.title().to_string(),
            item.variant().unwrap_or_default().to_string(),
            item.quantity().to_string(),
            format_minor(item.unit_price()),
            format_minor(item.line_total()),
        ]);
    }

    write_table(out, builder, 3..6)
}

fn write_table(out: &mut impl Write, builder: Builder, numeric: Range<usize>) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    writeln!(out, "{table}")
}
