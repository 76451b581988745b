//! Coupon table commands.

use azahar_core::CouponBook;

/// Print the built-in coupon table.
#[allow(clippy::print_stdout)] // CLI output belongs on stdout
pub fn list() {
    let book = CouponBook::builtin();

    println!("{:<12} {:>4}  {:>10}  {:>12}", "CODE", "PCT", "MIN ORDER", "MAX REDEEMS");
    for coupon in book.iter() {
        println!(
            "{:<12} {:>3}%  {:>10}  {:>12}",
            coupon.code,
            coupon.percentage,
            format!("${}", coupon.minimum_order),
            coupon.max_redemptions,
        );
    }
}
