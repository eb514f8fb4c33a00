//! Basic usage example for the Store.

use mini_kvstore_v2::Store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Basic Usage: mini-kvstore-v2 ===");

    let store = Store::open("example_store", 16 * 1024 * 1024)?;

    store.put("user:1:name", b"Alice")?;
    store.put("user:1:email", b"alice@example.com")?;
    store.put("user:2:name", b"Bob")?;
    store.put("user:2:email", b"bob@example.com")?;

    let name = store.get("user:1:name")?;
    assert_eq!(name, b"Alice", "Should retrieve Alice's name");
    println!("✓ User 1 name: {}", String::from_utf8_lossy(&name));

    let email = store.get("user:1:email")?;
    assert_eq!(email, b"alice@example.com", "Should retrieve Alice's email");
    println!("✓ User 1 email: {}", String::from_utf8_lossy(&email));

    // Overwrite a key; the newer value wins immediately.
    store.put("user:2:email", b"bob2@example.com")?;
    let updated_email = store.get("user:2:email")?;
    assert_eq!(updated_email, b"bob2@example.com");
    println!("✓ Overwrote user 2 email");

    let bob_name = store.get("user:2:name")?;
    assert_eq!(bob_name, b"Bob", "Bob's name should still exist");

    let keys = store.debug_keys();
    println!("Keys in store: {}", keys.len());

    store.close()?;
    Ok(())
}
