use mini_kvstore_v2::Store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Persistence Example ===");

    // Session 1: write values and close cleanly.
    {
        let store = Store::open("persisted_store", 16 * 1024 * 1024)?;
        store.put("session", b"first")?;
        store.put("counter", b"42")?;
        store.put("name", b"Test Store")?;
        store.close()?;
        println!("✓ Values written: session, counter, name");
    }

    // Session 2: reopen, confirm durability, overwrite one key.
    {
        let store = Store::open("persisted_store", 16 * 1024 * 1024)?;
        assert_eq!(store.get("session")?, b"first", "Session value should persist");
        assert_eq!(store.get("counter")?, b"42", "Counter value should persist");
        assert_eq!(store.get("name")?, b"Test Store", "Name value should persist");
        println!("✓ All data persisted correctly from session 1");

        store.put("counter", b"43")?;
        store.close()?;
        println!("✓ Counter updated to 43");
    }

    // Session 3: verify the overwrite survived too.
    {
        let store = Store::open("persisted_store", 16 * 1024 * 1024)?;
        assert_eq!(store.get("session")?, b"first", "Session should still persist");
        assert_eq!(store.get("counter")?, b"43", "Counter should reflect update");
        assert_eq!(store.get("name")?, b"Test Store", "Name should still persist");
        println!("✓ Session, updated counter, and unchanged name verified");
        store.close()?;
    }

    println!("  - Session 2: Read, overwrite");
    println!("  - Session 3: Verify all changes persisted across restarts");

    Ok(())
}
