//! Headless walkthrough: mount two markers, swap an icon in place and feed
//! pointer input through the map.
//!
//! Run with `RUST_LOG=debug cargo run --example marker_events`.

use maplet_markers::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn main() -> anyhow::Result<()> {
    maplet_markers::init_logging();

    let map = Map::with_view(LatLng::new(51.505, -0.09), 13.0, Point::new(800.0, 600.0));
    let map_clicks = Rc::new(Cell::new(0));
    {
        let map_clicks = Rc::clone(&map_clicks);
        map.on(EventType::Click, move |e| {
            map_clicks.set(map_clicks.get() + 1);
            println!("map click at {:?}", e.lat_lng);
        });
    }

    let depot = Marker::new([51.5, -0.09]).with_options(MarkerOptions {
        title: Some("Depot".to_string()),
        rise_on_hover: true,
        ..MarkerOptions::default()
    });
    depot.on(EventType::Click, |e| println!("depot clicked at {:?}", e.lat_lng));
    depot.on(EventType::Move, |e| {
        println!("depot moved {:?} -> {:?}", e.old_lat_lng, e.lat_lng)
    });
    depot.add_to(&map)?;

    let pin = Icon::new(
        IconOptions::new("pin.png")
            .with_icon_size([32.0, 48.0])
            .with_icon_anchor([16.0, 48.0])
            .with_class_name("depot-pin"),
    )?;
    let element = depot
        .icon_element()
        .ok_or_else(|| anyhow::anyhow!("depot is not rendered"))?;
    depot.set_icon(pin)?;
    println!(
        "same element after icon swap: {} ({})",
        depot.icon_element().as_ref() == Some(&element),
        element.src()
    );

    depot.set_lat_lng([51.51, -0.1])?;

    let at = map.lat_lng_to_container_point(&depot.lat_lng());
    let outcome = map.dispatch_dom_event(DomEvent::click(at).on(&element))?;
    println!("click on depot: {outcome:?}");

    let outcome = map.dispatch_dom_event(DomEvent::click(Point::new(20.0, 20.0)))?;
    println!("click on the map surface: {outcome:?}");

    depot.remove()?;
    let outcome = map.dispatch_dom_event(DomEvent::click(at).on(&element))?;
    println!("click on removed depot: {outcome:?}");
    println!("map saw {} click(s)", map_clicks.get());

    Ok(())
}
