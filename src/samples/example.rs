// Rust Example
use std::f64::consts::PI;

static USER_NAME: &str = "Alice";
static mut COUNT: i32 = 0;

fn calculate_area(radius: f64) -> f64 {
    let area = PI * radius * radius;
    area
}

struct Circle {
    radius: f64,
    name: String,
}

impl Circle {
    fn new(radius: f64, name: String) -> Circle {
        Circle { radius, name }
    }

    fn get_area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

fn main() {
    let circle = Circle::new(5.0, "MyCircle".to_string());
    let area = circle.get_area();

    println!("Hello, {}", USER_NAME);
    println!("Area: {:.2}", area);
}
